//! LRC 歌词解析
//!
//! 时间标签 `[mm:ss.xx]` 支持一行多标签（展开成多行），其余 `[key:value]`
//! 标签（ti/ar/al/by/offset 等）收进 info。解析结果按时间戳升序。

use std::collections::BTreeMap;

use super::{Lrc, LyricLine};

pub fn parse(text: &str) -> Lrc {
    let mut info = BTreeMap::new();
    let mut lines = Vec::new();

    for raw in text.lines() {
        let mut rest = raw.trim();
        if rest.is_empty() {
            continue;
        }

        let mut times = Vec::new();
        while let Some(stripped) = rest.strip_prefix('[') {
            let Some(end) = stripped.find(']') else {
                break;
            };
            let tag = &stripped[..end];
            rest = &stripped[end + 1..];
            match parse_timestamp_ms(tag) {
                Some(t) => times.push(t),
                None => {
                    if let Some((key, value)) = tag.split_once(':') {
                        info.insert(key.trim().to_owned(), value.trim().to_owned());
                    }
                }
            }
        }

        let content = rest.trim();
        for t in times {
            lines.push(LyricLine {
                time_ms: t,
                content: content.to_owned(),
            });
        }
    }

    lines.sort_by_key(|l| l.time_ms);
    Lrc { info, lines }
}

fn parse_timestamp_ms(tag: &str) -> Option<u64> {
    // mm:ss.xx 或 mm:ss.xxx，小数部分可缺省
    let (mm, rest) = tag.split_once(':')?;
    let mm: u64 = mm.parse().ok()?;
    let (ss, frac) = rest.split_once('.').unwrap_or((rest, ""));
    let ss: u64 = ss.parse().ok()?;
    let frac_digits = frac
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .take(3)
        .collect::<String>();
    let frac_val: u64 = if frac_digits.is_empty() {
        0
    } else {
        frac_digits.parse().ok()?
    };
    let frac_ms = match frac_digits.len() {
        0 => 0,
        1 => frac_val * 100,
        2 => frac_val * 10,
        _ => frac_val,
    };
    Some(mm * 60_000 + ss * 1_000 + frac_ms)
}
