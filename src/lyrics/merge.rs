//! 主轨与翻译轨的合并
//!
//! 两条已按时间戳升序的序列做一趟 merge-join：时间戳相等时把翻译文本挂到
//! 主轨行上，双指针同时前进；主轨较小则该行保持无翻译；翻译较小则该行被
//! 丢弃（没有可挂靠的主轨行）。主轨是权威，输出行数恒等于主轨行数。

use super::{Lrc, MergedLine, MergedLyric};

pub fn merge(primary: &Lrc, translated: &Lrc) -> MergedLyric {
    let mut lines: Vec<MergedLine> = primary
        .lines
        .iter()
        .map(|l| MergedLine {
            time_ms: l.time_ms,
            content: l.content.clone(),
            trans: None,
        })
        .collect();

    let mut i = 0;
    let mut j = 0;
    while i < lines.len() && j < translated.lines.len() {
        let t = &translated.lines[j];
        if lines[i].time_ms == t.time_ms {
            lines[i].trans = Some(t.content.clone());
            i += 1;
            j += 1;
        } else if lines[i].time_ms < t.time_ms {
            i += 1;
        } else {
            j += 1;
        }
    }

    MergedLyric {
        info: primary.info.clone(),
        trans_info: translated.info.clone(),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::LyricLine;
    use std::collections::BTreeMap;

    fn lrc(pairs: &[(u64, &str)]) -> Lrc {
        Lrc {
            info: BTreeMap::new(),
            lines: pairs
                .iter()
                .map(|&(time_ms, content)| LyricLine {
                    time_ms,
                    content: content.to_owned(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_merge_aligned_pair() {
        // 主轨 [{0,"a"},{10,"b"}] + 翻译 [{10,"b-tr"}]
        let merged = merge(&lrc(&[(0, "a"), (10, "b")]), &lrc(&[(10, "b-tr")]));
        assert_eq!(merged.lines.len(), 2);
        assert_eq!(merged.lines[0].time_ms, 0);
        assert_eq!(merged.lines[0].content, "a");
        assert_eq!(merged.lines[0].trans, None);
        assert_eq!(merged.lines[1].time_ms, 10);
        assert_eq!(merged.lines[1].content, "b");
        assert_eq!(merged.lines[1].trans.as_deref(), Some("b-tr"));
    }

    #[test]
    fn test_merge_output_length_equals_primary() {
        let primary = lrc(&[(0, "a"), (5, "b"), (10, "c"), (15, "d")]);
        let translated = lrc(&[(3, "x"), (5, "b-tr"), (12, "y"), (15, "d-tr"), (99, "z")]);
        let merged = merge(&primary, &translated);
        assert_eq!(merged.lines.len(), primary.lines.len());
        assert_eq!(merged.lines[1].trans.as_deref(), Some("b-tr"));
        assert_eq!(merged.lines[3].trans.as_deref(), Some("d-tr"));
        // 没有主轨对应的翻译行被丢弃
        assert!(merged.lines.iter().all(|l| l.trans.as_deref() != Some("x")));
    }

    #[test]
    fn test_merge_output_stays_sorted() {
        let merged = merge(
            &lrc(&[(0, "a"), (7, "b"), (7, "c"), (20, "d")]),
            &lrc(&[(7, "tr")]),
        );
        assert!(
            merged
                .lines
                .windows(2)
                .all(|w| w[0].time_ms <= w[1].time_ms)
        );
    }

    #[test]
    fn test_merge_empty_translation() {
        let merged = merge(&lrc(&[(0, "a")]), &lrc(&[]));
        assert_eq!(merged.lines.len(), 1);
        assert_eq!(merged.lines[0].trans, None);
    }

    #[test]
    fn test_merge_empty_primary() {
        let merged = merge(&lrc(&[]), &lrc(&[(0, "tr")]));
        assert!(merged.lines.is_empty());
    }

    #[test]
    fn test_merge_carries_info_sections() {
        let mut primary = lrc(&[(0, "a")]);
        primary.info.insert("ti".to_owned(), "歌名".to_owned());
        let mut translated = lrc(&[(0, "tr")]);
        translated.info.insert("by".to_owned(), "译者".to_owned());

        let merged = merge(&primary, &translated);
        assert_eq!(merged.info.get("ti").map(String::as_str), Some("歌名"));
        assert_eq!(merged.trans_info.get("by").map(String::as_str), Some("译者"));
    }
}
