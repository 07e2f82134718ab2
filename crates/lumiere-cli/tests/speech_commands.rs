//! Speech-backed commands against a mocked proxy.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Four samples of 16-bit PCM: 0, 1, -1, 16384.
const TINY_CLIP: &str = "AAABAP//AEA=";

fn workspace(server: &MockServer) -> TempDir {
    let dir = TempDir::new().unwrap();
    let config = format!(
        "cues = false\nstate_path = \"{}\"\n\n[service]\nbase_url = \"{}\"\ntimeout_secs = 5\n",
        dir.path().join("state.json").display(),
        server.uri()
    );
    std::fs::write(dir.path().join("lumiere.toml"), config).unwrap();
    dir
}

fn lumiere(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("lumiere").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("LUMIERE_SERVICE_URL")
        .env_remove("LUMIERE_STATE_PATH");
    cmd
}

#[tokio::test(flavor = "multi_thread")]
async fn say_requests_the_chosen_voice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/proxy"))
        .and(body_partial_json(
            serde_json::json!({"type": "tts", "text": "Hello", "voice": "Puck"}),
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"audio": TINY_CLIP})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = workspace(&server);
    lumiere(&dir)
        .args(["say", "Hello", "--voice", "Puck"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello (Puck"));
}

#[tokio::test(flavor = "multi_thread")]
async fn say_reports_throttling_as_a_notice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/proxy"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
        .mount(&server)
        .await;

    let dir = workspace(&server);
    lumiere(&dir)
        .args(["say", "Hello"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Too many requests"));
}

#[tokio::test(flavor = "multi_thread")]
async fn explain_prints_the_explanation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/proxy"))
        .and(body_partial_json(
            serde_json::json!({"type": "explain", "text": "Break a leg"}),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"text": "A way to wish someone luck."})),
        )
        .mount(&server)
        .await;

    let dir = workspace(&server);
    lumiere(&dir)
        .args(["explain", "Break a leg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A way to wish someone luck."));
}

#[tokio::test(flavor = "multi_thread")]
async fn explain_falls_back_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/proxy"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let dir = workspace(&server);
    lumiere(&dir)
        .args(["explain", "Hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Thinking failed."))
        .stderr(predicate::str::contains("Explanation is unavailable"));
}

#[tokio::test(flavor = "multi_thread")]
async fn scenario_alternates_voices() {
    let server = MockServer::start().await;
    for voice in ["Kore", "Fenrir"] {
        Mock::given(method("POST"))
            .and(path("/api/proxy"))
            .and(body_partial_json(serde_json::json!({"voice": voice})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"audio": TINY_CLIP})),
            )
            .mount(&server)
            .await;
    }

    let dir = workspace(&server);
    lumiere(&dir)
        .args(["scenario", "s1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Staff: May I see your passport"));

    let requests = server.received_requests().await.unwrap();
    let voices: Vec<String> = requests
        .iter()
        .map(|r| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            body["voice"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(voices, vec!["Kore", "Fenrir", "Kore"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn quiz_can_play_the_target_word() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/proxy"))
        .and(body_partial_json(
            serde_json::json!({"type": "tts", "text": "Ambition", "voice": "Kore"}),
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"audio": TINY_CLIP})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = workspace(&server);
    std::fs::write(
        dir.path().join("one.toml"),
        r#"[curriculum]
name = "One Word"

[[levels]]
id = "solo"
title = "Solo"

[[levels.words]]
id = "w1"
headword = "Ambition"
translation = "雄心"
"#,
    )
    .unwrap();
    let config_path = dir.path().join("lumiere.toml");
    let config = std::fs::read_to_string(&config_path).unwrap();
    std::fs::write(&config_path, format!("curriculum = \"one.toml\"\n{config}")).unwrap();

    lumiere(&dir)
        .args(["quiz", "--level", "solo", "--seed", "1"])
        .write_stdin("s\nAmbition\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("(s) hear the word"))
        .stdout(predicate::str::contains("Score:"));
}
