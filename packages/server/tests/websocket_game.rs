//! WebSocket integration tests.
//!
//! Drive whole rooms over real connections: joining, ready-up, a full game
//! through to game over, scoped delivery, and error reporting.

mod fixtures;

use std::{collections::HashMap, time::Duration};

use fixtures::{TestServer, WsClient, player};
use mafia_server::domain::{GameConfig, PhaseDurations};
use serde_json::{Value, json};

/// Create a room as p1 and seat p2..=pN; returns the code and clients in
/// join order.
async fn seat_players(server: &TestServer, n: usize) -> (String, Vec<WsClient>) {
    let mut host = WsClient::connect(server).await;
    host.send(json!({
        "type": "create-room",
        "roomName": "Town",
        "player": player("p1", "Player 1"),
    }))
    .await;
    let created = host.recv_type("room-created").await;
    let code = created["data"]["roomCode"].as_str().unwrap().to_string();

    let mut clients = vec![host];
    for i in 2..=n {
        let mut client = WsClient::connect(server).await;
        client
            .send(json!({
                "type": "join-room",
                "roomCode": code,
                "player": player(&format!("p{i}"), &format!("Player {i}")),
            }))
            .await;
        client.recv_type("player-joined").await;
        clients.push(client);
    }
    (code, clients)
}

/// Ready everyone and return each player's role, keyed by player id.
async fn start_game(code: &str, clients: &mut [WsClient]) -> HashMap<String, String> {
    for (i, client) in clients.iter_mut().enumerate().skip(1) {
        client
            .send(json!({
                "type": "toggle-ready",
                "roomCode": code,
                "playerId": format!("p{}", i + 1),
                "isReady": true,
            }))
            .await;
    }

    let mut roles = HashMap::new();
    for client in clients.iter_mut() {
        let assigned = client.recv_type("role-assigned").await;
        roles.insert(
            assigned["data"]["playerId"].as_str().unwrap().to_string(),
            assigned["data"]["role"].as_str().unwrap().to_string(),
        );
        client.recv_phase("role-assignment").await;
    }
    roles
}

fn index_of(id: &str) -> usize {
    id.trim_start_matches('p').parse::<usize>().unwrap() - 1
}

fn holder<'a>(roles: &'a HashMap<String, String>, role: &str) -> &'a str {
    roles
        .iter()
        .find(|(_, r)| r.as_str() == role)
        .map(|(id, _)| id.as_str())
        .unwrap()
}

fn quick_config() -> GameConfig {
    GameConfig {
        durations: PhaseDurations {
            day: Duration::from_millis(200),
            elimination: Duration::from_millis(200),
            ..PhaseDurations::default()
        },
        ..GameConfig::default()
    }
}

#[tokio::test]
async fn test_welcome_on_connect() {
    // テスト項目: 接続すると connectionId を含む welcome イベントを受け取る
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let client = WsClient::connect(&server).await;

    // then (期待する結果):
    assert!(!client.connection_id.is_empty());
}

#[tokio::test]
async fn test_join_with_wrong_password_is_rejected() {
    // テスト項目: パスワードが異なる参加要求は本人にだけエラーが返る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut host = WsClient::connect(&server).await;
    host.send(json!({
        "type": "create-room",
        "roomName": "Private",
        "password": "hunter2",
        "player": player("p1", "Alice"),
    }))
    .await;
    let created = host.recv_type("room-created").await;
    let code = created["data"]["roomCode"].as_str().unwrap();
    assert_eq!(created["data"]["roomPassword"], "hunter2");
    let mut guest = WsClient::connect(&server).await;

    // when (操作):
    guest
        .send(json!({
            "type": "join-room",
            "roomCode": code,
            "password": "wrong",
            "player": player("p2", "Bob"),
        }))
        .await;

    // then (期待する結果):
    let error = guest.recv_type("error").await;
    assert_eq!(error["data"]["message"], "Incorrect password");
}

#[tokio::test]
async fn test_duplicate_name_is_rejected_case_insensitively() {
    // テスト項目: 大文字小文字だけが異なる名前での参加は拒否される
    // given (前提条件):
    let server = TestServer::start().await;
    let (code, _clients) = seat_players(&server, 1).await;
    let mut guest = WsClient::connect(&server).await;

    // when (操作):
    guest
        .send(json!({
            "type": "join-room",
            "roomCode": code,
            "player": player("p2", "PLAYER 1"),
        }))
        .await;

    // then (期待する結果):
    let error = guest.recv_type("error").await;
    assert!(
        error["data"]["message"]
            .as_str()
            .unwrap()
            .contains("already taken")
    );
}

#[tokio::test]
async fn test_malformed_frames_report_errors() {
    // テスト項目: 不正なフレームはエラーとして本人に返され、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = WsClient::connect(&server).await;

    // when (操作) / then (期待する結果):
    client.send_text("definitely not json".to_string()).await;
    let error = client.recv_type("error").await;
    assert_eq!(error["data"]["message"], "Invalid message format");

    client.send(json!({ "type": "fly-away" })).await;
    let error = client.recv_type("error").await;
    assert_eq!(error["data"]["message"], "Unknown message type: fly-away");

    client
        .send(json!({ "type": "start-game", "roomCode": "AAAAAA" }))
        .await;
    let error = client.recv_type("error").await;
    assert_eq!(error["data"]["message"], "Room not found");
}

#[tokio::test]
async fn test_start_game_requires_ready_players() {
    // テスト項目: 人数や準備が足りない状態でのゲーム開始は拒否される
    // given (前提条件):
    let server = TestServer::start().await;
    let (code, mut clients) = seat_players(&server, 3).await;

    // when (操作):
    clients[0]
        .send(json!({ "type": "start-game", "roomCode": code }))
        .await;

    // then (期待する結果):
    let error = clients[0].recv_type("error").await;
    assert!(
        error["data"]["message"]
            .as_str()
            .unwrap()
            .contains("at least 4")
    );
}

#[tokio::test]
async fn test_roles_are_private_and_mafia_chat_is_scoped() {
    // テスト項目: 役職は本人にだけ届き、マフィアチャットはマフィアにしか届かない
    // given (前提条件):
    let server = TestServer::start().await;
    let (code, mut clients) = seat_players(&server, 4).await;
    let roles = start_game(&code, &mut clients).await;
    assert_eq!(roles.len(), 4);
    assert_eq!(roles.values().filter(|r| *r == "mafia").count(), 1);
    let mafia = holder(&roles, "mafia").to_string();
    let observer = (index_of(&mafia) + 1) % clients.len();

    // when (操作): マフィアチャットの後に公開チャットを送る
    let sender = &mut clients[index_of(&mafia)];
    sender
        .send(json!({
            "type": "chat-message",
            "roomCode": code,
            "playerId": mafia,
            "playerName": "ignored",
            "message": "we strike at p2",
            "isMafiaChat": true,
        }))
        .await;
    sender
        .send(json!({
            "type": "chat-message",
            "roomCode": code,
            "playerId": mafia,
            "playerName": "ignored",
            "message": "good morning",
            "isMafiaChat": false,
        }))
        .await;

    // then (期待する結果): 他のプレイヤーが最初に受け取るチャットは公開チャット
    let first_chat = clients[observer].recv_type("chat-message").await;
    assert_eq!(first_chat["data"]["message"], "good morning");
    assert_eq!(first_chat["data"]["isMafiaChat"], false);
    assert_eq!(
        first_chat["data"]["playerName"],
        format!("Player {}", index_of(&mafia) + 1)
    );
}

#[tokio::test]
async fn test_full_game_until_villagers_win() {
    // テスト項目: 夜の行動・昼・投票を経て村人陣営が勝利するまで一通り進行する
    // given (前提条件):
    let server = TestServer::start_with(quick_config()).await;
    let (code, mut clients) = seat_players(&server, 4).await;
    let roles = start_game(&code, &mut clients).await;
    let mafia = holder(&roles, "mafia").to_string();
    let doctor = holder(&roles, "doctor").to_string();
    let detective = holder(&roles, "detective").to_string();
    let villager = holder(&roles, "villager").to_string();

    // when (操作): 全員が役職を確認する
    for (i, client) in clients.iter_mut().enumerate() {
        client
            .send(json!({ "type": "confirm-role", "roomCode": code, "playerId": format!("p{}", i + 1) }))
            .await;
    }
    for client in clients.iter_mut() {
        let night = client.recv_phase("night").await;
        assert_eq!(night["data"]["nightCount"], 1);
        assert_eq!(night["data"]["timer"], 30);
    }

    // when (操作): 夜の行動（マフィアは村人を襲撃、医者は自分を守り、探偵はマフィアを調査）
    let actions = [
        (&mafia, &villager, "mafia"),
        (&doctor, &doctor, "doctor"),
        (&detective, &mafia, "detective"),
    ];
    for (actor, target, role) in actions {
        clients[index_of(actor)]
            .send(json!({
                "type": "night-action",
                "roomCode": code,
                "playerId": actor,
                "targetId": target,
                "role": role,
            }))
            .await;
    }

    // then (期待する結果): 探偵だけが調査結果を受け取る
    let result = clients[index_of(&detective)]
        .recv_type("investigation-result")
        .await;
    assert_eq!(result["data"]["targetId"], mafia.as_str());
    assert_eq!(result["data"]["isMafia"], true);

    // then (期待する結果): 村人が夜に倒れ、昼になる
    for client in clients.iter_mut() {
        let eliminated = client.recv_type("player-eliminated").await;
        assert_eq!(eliminated["data"]["player"]["id"], villager.as_str());
        assert_eq!(eliminated["data"]["player"]["role"], "villager");
        assert_eq!(eliminated["data"]["cause"], "night");
        let day = client.recv_phase("day").await;
        assert_eq!(day["data"]["dayCount"], 1);
    }

    // when (操作): 昼のタイマーが切れて投票になる
    for client in clients.iter_mut() {
        client.recv_phase("voting").await;
    }

    // when (操作): 生存者全員が投票する
    let votes = [(&doctor, &mafia), (&detective, &mafia), (&mafia, &doctor)];
    for (voter, target) in votes {
        clients[index_of(voter)]
            .send(json!({
                "type": "vote",
                "roomCode": code,
                "voterId": voter,
                "targetId": target,
            }))
            .await;
    }

    // then (期待する結果): マフィアが処刑され、村人陣営の勝利で全員の役職が公開される
    let observer = &mut clients[index_of(&villager)];
    let eliminated = observer.recv_type("player-eliminated").await;
    assert_eq!(eliminated["data"]["player"]["id"], mafia.as_str());
    assert_eq!(eliminated["data"]["cause"], "vote");
    observer.recv_phase("elimination").await;
    observer.recv_phase("game-over").await;
    let over = observer.recv_type("game-over").await;
    assert_eq!(over["data"]["winner"], "villagers");
    let players = over["data"]["players"].as_array().unwrap();
    assert_eq!(players.len(), 4);
    assert!(players.iter().all(|p| p["role"].is_string()));

    // when (操作): ホストがリセットする
    let host = &mut clients[0];
    host.send(json!({ "type": "reset-game", "roomCode": code }))
        .await;

    // then (期待する結果):
    let reset: Value = host.recv_type("game-reset").await;
    let players = reset["data"]["players"].as_array().unwrap();
    assert!(players.iter().all(|p| p["isAlive"] == true));
    assert!(players.iter().all(|p| p.get("role").is_none()));
    host.recv_phase("lobby").await;
}

#[tokio::test]
async fn test_cannot_act_for_another_player() {
    // テスト項目: 他のプレイヤーになりすました操作は拒否される
    // given (前提条件):
    let server = TestServer::start().await;
    let (code, mut clients) = seat_players(&server, 2).await;

    // when (操作):
    clients[1]
        .send(json!({ "type": "leave-room", "roomCode": code, "playerId": "p1" }))
        .await;

    // then (期待する結果):
    let error = clients[1].recv_type("error").await;
    assert_eq!(
        error["data"]["message"],
        "Connection is not bound to this player"
    );
}
