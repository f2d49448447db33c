//! 会话状态机端到端：登录、恢复与登出（mockito 假服务端）

use ncm_core::netease::{NcmClient, NcmClientConfig, Session};
use ncm_core::storage::{KvStorage, MemoryStorage};
use ncm_core::store::actions;
use ncm_core::store::state::{AppState, LoginState};

fn client_for(server: &mockito::Server) -> NcmClient {
    NcmClient::new(NcmClientConfig {
        domain: server.url(),
    })
    .expect("client")
}

const LOGIN_OK: &str =
    r#"{"code":200,"profile":{"userId":42,"nickname":"测试用户"},"account":{"id":42}}"#;
const PLAYLISTS_OK: &str = r#"{"code":200,"playlist":[
    {"id":111,"name":"测试用户喜欢的音乐","trackCount":2,
     "creator":{"userId":42,"nickname":"测试用户"}},
    {"id":222,"name":"普通歌单","trackCount":5}
]}"#;
const DETAIL_OK: &str = r#"{"code":200,"playlist":{"id":111,"name":"测试用户喜欢的音乐",
    "trackCount":2,"tracks":[
        {"id":1,"name":"一","ar":[{"name":"甲"}]},
        {"id":2,"name":"二","ar":[{"name":"乙"}]}
    ]}}"#;

#[tokio::test]
async fn login_success_commits_state_and_persists_credential() {
    let mut server = mockito::Server::new_async().await;
    let _login = server
        .mock("POST", "/weapi/login/cellphone")
        .with_status(200)
        .with_header("set-cookie", "MUSIC_U=token; Path=/")
        .with_header("set-cookie", "__csrf=tok; Path=/")
        .with_body(LOGIN_OK)
        .create_async()
        .await;
    let _playlists = server
        .mock("POST", "/weapi/user/playlist")
        .with_status(200)
        .with_body(PLAYLISTS_OK)
        .create_async()
        .await;
    let _detail = server
        .mock("POST", "/weapi/v3/playlist/detail")
        .with_status(200)
        .with_body(DETAIL_OK)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut state = AppState::default();
    let mut session = Session::new();
    let mut storage = MemoryStorage::new();

    let resp = actions::login(
        &mut state,
        &mut session,
        &client,
        &mut storage,
        "13800138000",
        "secret",
    )
    .await
    .expect("login");

    assert_eq!(resp.code, 200);
    assert_eq!(state.login, LoginState::LoggedIn);
    assert_eq!(state.user.id, 42);
    assert_eq!(state.user.nickname, "测试用户");
    assert!(session.is_authenticated());

    // 凭证已落盘
    assert!(storage.get("user").is_some());
    let cookie = storage.get("cookie").expect("cookie persisted");
    assert!(cookie.contains("MUSIC_U"));

    // 歌单已拉取，"喜欢的音乐"叠加了完整详情
    assert_eq!(state.user_playlists.len(), 2);
    assert_eq!(state.user_playlists[0].id, 111);
    assert_eq!(state.user_playlists[0].tracks.len(), 2);
    assert!(state.user_playlists[1].tracks.is_empty());
}

#[tokio::test]
async fn login_rejected_clears_credential() {
    let mut server = mockito::Server::new_async().await;
    let _login = server
        .mock("POST", "/weapi/login/cellphone")
        .with_status(200)
        .with_header("set-cookie", "NMTID=junk; Path=/")
        .with_body(r#"{"code":502,"msg":"账号或密码错误"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut state = AppState::default();
    let mut session = Session::new();
    let mut storage = MemoryStorage::new();

    let resp = actions::login(
        &mut state,
        &mut session,
        &client,
        &mut storage,
        "13800138000",
        "wrong",
    )
    .await
    .expect("login call itself succeeds");

    assert_eq!(resp.code, 502);
    assert_eq!(state.login, LoginState::LoginInvalid);
    assert!(session.is_empty());
    assert!(storage.get("cookie").is_none());
}

#[tokio::test]
async fn email_account_uses_plain_login_endpoint() {
    let mut server = mockito::Server::new_async().await;
    let login = server
        .mock("POST", "/weapi/login")
        .with_status(200)
        .with_body(r#"{"code":502}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut state = AppState::default();
    let mut session = Session::new();
    let mut storage = MemoryStorage::new();

    actions::login(
        &mut state,
        &mut session,
        &client,
        &mut storage,
        "user@example.com",
        "pw",
    )
    .await
    .expect("login");

    login.assert_async().await;
}

#[tokio::test]
async fn restore_applies_persisted_session_then_validates() {
    let mut server = mockito::Server::new_async().await;
    let _refresh = server
        .mock("POST", "/weapi/login/token/refresh")
        .with_status(200)
        .with_header("set-cookie", "MUSIC_U=rotated; Path=/")
        .with_body(r#"{"code":200}"#)
        .create_async()
        .await;
    let _playlists = server
        .mock("POST", "/weapi/user/playlist")
        .with_status(200)
        .with_body(PLAYLISTS_OK)
        .create_async()
        .await;
    let _detail = server
        .mock("POST", "/weapi/v3/playlist/detail")
        .with_status(200)
        .with_body(DETAIL_OK)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut state = AppState::default();
    let mut session = Session::new();
    let mut storage = MemoryStorage::new();
    storage
        .set("user", r#"{"id":42,"nickname":"测试用户"}"#)
        .unwrap();
    storage
        .set("cookie", r#"{"cookies":{"MUSIC_U":"persisted"}}"#)
        .unwrap();

    let ok = actions::restore_user(&mut state, &mut session, &client, &mut storage)
        .await
        .expect("restore");

    assert!(ok);
    assert_eq!(state.login, LoginState::LoggedIn);
    assert_eq!(state.user.id, 42);
    // 服务端轮换过的 cookie 被吸收并重新落盘
    assert_eq!(session.get("MUSIC_U"), Some("rotated"));
    assert!(storage.get("cookie").unwrap().contains("rotated"));
    assert_eq!(state.user_playlists.len(), 2);
}

#[tokio::test]
async fn restore_with_invalid_cookie_reverts_to_cleared() {
    let mut server = mockito::Server::new_async().await;
    let _refresh = server
        .mock("POST", "/weapi/login/token/refresh")
        .with_status(200)
        .with_body(r#"{"code":301}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut state = AppState::default();
    let mut session = Session::new();
    let mut storage = MemoryStorage::new();
    storage
        .set("user", r#"{"id":42,"nickname":"测试用户"}"#)
        .unwrap();
    storage
        .set("cookie", r#"{"cookies":{"MUSIC_U":"stale"}}"#)
        .unwrap();

    let ok = actions::restore_user(&mut state, &mut session, &client, &mut storage)
        .await
        .expect("restore");

    assert!(!ok);
    assert_eq!(state.login, LoginState::LoginInvalid);
    assert!(session.is_empty());
}

#[tokio::test]
async fn restore_with_corrupted_user_skips_quietly() {
    let server = mockito::Server::new_async().await;
    let client = client_for(&server);
    let mut state = AppState::default();
    let mut session = Session::new();
    let mut storage = MemoryStorage::new();
    storage.set("user", "{broken").unwrap();
    storage.set("cookie", r#"{"cookies":{}}"#).unwrap();

    let ok = actions::restore_user(&mut state, &mut session, &client, &mut storage)
        .await
        .expect("restore");
    assert!(!ok);
    assert_eq!(state.login, LoginState::LoggedOut);
}

#[tokio::test]
async fn logout_clears_everything() {
    let mut server = mockito::Server::new_async().await;
    let _logout = server
        .mock("POST", "/weapi/logout")
        .with_status(200)
        .with_body(r#"{"code":200}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut state = AppState::default();
    let mut session = Session::new();
    session.insert("MUSIC_U", "token");
    let mut storage = MemoryStorage::new();
    storage.set("user", "{}").unwrap();
    storage.set("cookie", "{}").unwrap();
    state.favorites.album = Some(serde_json::json!({"id": 1}));

    actions::logout(&mut state, &mut session, &client, &mut storage)
        .await
        .expect("logout");

    assert_eq!(state.login, LoginState::LoggedOut);
    assert!(session.is_empty());
    assert!(storage.get("user").is_none());
    assert!(storage.get("cookie").is_none());
    assert!(state.favorites.album.is_none());
}

#[tokio::test]
async fn subscribe_rejected_raises_response_code() {
    let mut server = mockito::Server::new_async().await;
    let _sub = server
        .mock("POST", "/weapi/playlist/subscribe")
        .with_status(200)
        .with_body(r#"{"code":502}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let mut state = AppState::default();
    let mut session = Session::new();

    let err = actions::subscribe_playlist(
        &mut state,
        &mut session,
        &client,
        ncm_core::domain::PlaylistMeta {
            id: 9,
            name: "合集".to_owned(),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        ncm_core::error::StoreError::Rejected { code: 502 }
    ));
    assert!(state.user_playlists.is_empty());
}
