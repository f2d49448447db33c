//! 签名 POST 传输层

use reqwest::header::{HeaderMap, HeaderValue, REFERER, SET_COOKIE, USER_AGENT};
use serde_json::Value;

use super::crypto;
use super::session::Session;
use crate::error::ApiError;

const UA_WEAPI_PC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0";

#[derive(Debug, Clone)]
pub struct NcmClientConfig {
    pub domain: String,
}

impl Default for NcmClientConfig {
    fn default() -> Self {
        Self {
            domain: "http://music.163.com".to_owned(),
        }
    }
}

#[derive(Debug)]
pub struct NcmClient {
    http: reqwest::Client,
    pub cfg: NcmClientConfig,
}

impl NcmClient {
    pub fn new(cfg: NcmClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(UA_WEAPI_PC)
            .build()
            .map_err(ApiError::Transport)?;
        Ok(Self { http, cfg })
    }

    /// 发一个 weapi 签名 POST。
    ///
    /// `path` 是 `/weapi/` 之后的部分。负载会被注入 `csrf_token` 后整体加密；
    /// 响应里的 Set-Cookie 全部回写进 `session`。应用层 `code != 200` 不视为
    /// 错误，响应体原样返回，由调用方裁决。这一层不做重试。
    pub async fn post(
        &self,
        session: &mut Session,
        path: &str,
        mut payload: Value,
    ) -> Result<Value, ApiError> {
        let obj = payload
            .as_object_mut()
            .ok_or(ApiError::BadInput("payload 必须是 JSON object"))?;
        obj.insert("csrf_token".to_owned(), Value::String(session.csrf_token()));

        let form = crypto::weapi(&payload)?;
        let url = format!(
            "{}/weapi/{}",
            self.cfg.domain.trim_end_matches('/'),
            path.trim_start_matches('/'),
        );

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(UA_WEAPI_PC));
        headers.insert(
            REFERER,
            HeaderValue::from_str(&self.cfg.domain)
                .map_err(|e| ApiError::BadHeader(format!("REFERER: {e}")))?,
        );
        if !session.is_empty() {
            headers.insert(
                "Cookie",
                HeaderValue::from_str(&session.header_value())
                    .map_err(|e| ApiError::BadHeader(format!("Cookie: {e}")))?,
            );
        }

        let resp = self
            .http
            .post(url)
            .headers(headers)
            .form(&[("params", form.params), ("encSecKey", form.enc_sec_key)])
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let set_cookies = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(ToOwned::to_owned))
            .collect::<Vec<String>>();

        let bytes = resp.bytes().await.map_err(ApiError::Transport)?;
        let body: Value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()));

        session.absorb(&set_cookies);

        Ok(body)
    }
}
