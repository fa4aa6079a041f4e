//! Dropped connections and replayed scripts

use pv_core::repositories::{ConditionalSet, KeyValueBackend, Promotion};
use redis::aio::MultiplexedConnection;
use redis::Script;

use crate::cache::scripts;
use crate::cache::{CacheConfig, RedisClient};

use super::fake_server::{FakeRedis, Reply};

const KEY: &str = "pending:5551234567";
const PHONE: &str = "5551234567";

async fn client_for(server: &FakeRedis) -> RedisClient {
    RedisClient::new(CacheConfig::new(server.url()).with_retry(5, 10))
        .await
        .unwrap()
}

fn last_arg(command: &[String]) -> &str {
    command.last().map(String::as_str).unwrap_or_default()
}

#[tokio::test]
async fn test_recovers_after_server_closes_connection() {
    let server = FakeRedis::start(|connection, command| match command[0].as_str() {
        "EXISTS" if connection == 0 => Reply::SendAndClose(":1\r\n"),
        "EXISTS" => Reply::Send(":1\r\n"),
        _ => Reply::Send("+OK\r\n"),
    })
    .await;
    let client = client_for(&server).await;

    assert!(client.exists(KEY).await.unwrap());
    // The first socket is gone; the call must succeed on a fresh one
    assert!(client.exists(KEY).await.unwrap());
    assert!(client.exists(KEY).await.unwrap());

    assert!(server.connections() >= 2);
}

#[tokio::test]
async fn test_promotion_replayed_after_lost_reply() {
    let server = FakeRedis::start(|connection, command| match command[0].as_str() {
        "EVALSHA" if connection == 0 => Reply::Close,
        "EVALSHA" => Reply::Send(":0\r\n"),
        _ => Reply::Send("+OK\r\n"),
    })
    .await;
    let client = client_for(&server).await;

    let outcome = KeyValueBackend::take_if_equal_and_add(&client, KEY, "QWERTY", "verified", PHONE)
        .await
        .unwrap();
    assert_eq!(outcome, Promotion::Promoted);

    let calls = server.commands("EVALSHA");
    assert_eq!(calls.len(), 2);
    assert_eq!(last_arg(&calls[0].1), "0");
    assert_eq!(last_arg(&calls[1].1), "1");
    assert_ne!(calls[0].0, calls[1].0);
}

#[tokio::test]
async fn test_conditional_set_replayed_after_lost_reply() {
    let server = FakeRedis::start(|connection, command| match command[0].as_str() {
        "EVALSHA" if connection == 0 => Reply::Close,
        "EVALSHA" => Reply::Send(":0\r\n"),
        _ => Reply::Send("+OK\r\n"),
    })
    .await;
    let client = client_for(&server).await;

    let outcome =
        KeyValueBackend::set_if_absent_unless_member(&client, KEY, "QWERTY", "verified", PHONE)
            .await
            .unwrap();
    assert_eq!(outcome, ConditionalSet::Written);

    let calls = server.commands("EVALSHA");
    assert_eq!(calls.len(), 2);
    assert_eq!(last_arg(&calls[1].1), "1");
}

#[tokio::test]
async fn test_single_attempt_sends_first_attempt_flag() {
    let server = FakeRedis::start(|_, command| match command[0].as_str() {
        "EVALSHA" => Reply::Send(":1\r\n"),
        _ => Reply::Send("+OK\r\n"),
    })
    .await;
    let client = client_for(&server).await;

    let outcome = KeyValueBackend::take_if_equal_and_add(&client, KEY, "QWERTY", "verified", PHONE)
        .await
        .unwrap();
    assert_eq!(outcome, Promotion::Missing);

    let calls = server.commands("EVALSHA");
    assert_eq!(calls.len(), 1);
    assert_eq!(last_arg(&calls[0].1), "0");
}

async fn run_script(
    script: &Script,
    conn: &mut MultiplexedConnection,
    keys: [&str; 2],
    flag: &str,
) -> i64 {
    script
        .key(keys[0])
        .key(keys[1])
        .arg("QWERTY")
        .arg(PHONE)
        .arg(flag)
        .invoke_async(conn)
        .await
        .unwrap()
}

/// Runs the scripts themselves; needs a Redis server at `REDIS_URL`
#[tokio::test]
#[ignore]
async fn test_scripts_treat_applied_state_as_success_on_replay() {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let client = redis::Client::open(url).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();

    let keys = ["test:replay:pending:5551234567", "test:replay:verified"];
    let _: () = redis::cmd("DEL").arg(keys[0]).arg(keys[1]).query_async(&mut conn).await.unwrap();

    let conditional_set = Script::new(scripts::CONDITIONAL_SET);
    assert_eq!(run_script(&conditional_set, &mut conn, keys, "0").await, 0);
    assert_eq!(run_script(&conditional_set, &mut conn, keys, "0").await, 1);
    assert_eq!(run_script(&conditional_set, &mut conn, keys, "1").await, 0);

    let take_and_promote = Script::new(scripts::TAKE_AND_PROMOTE);
    assert_eq!(run_script(&take_and_promote, &mut conn, keys, "0").await, 0);
    assert_eq!(run_script(&take_and_promote, &mut conn, keys, "0").await, 1);
    assert_eq!(run_script(&take_and_promote, &mut conn, keys, "1").await, 0);

    let _: () = redis::cmd("DEL").arg(keys[0]).arg(keys[1]).query_async(&mut conn).await.unwrap();
}
