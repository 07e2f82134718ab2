//! The `lumiere init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("lumiere.toml").exists() {
        println!("lumiere.toml already exists, skipping.");
    } else {
        std::fs::write("lumiere.toml", SAMPLE_CONFIG)?;
        println!("Created lumiere.toml");
    }

    std::fs::create_dir_all("curricula")?;
    let example_path = Path::new("curricula/example.toml");
    if example_path.exists() {
        println!("curricula/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_CURRICULUM)?;
        println!("Created curricula/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point [service] base_url in lumiere.toml at your speech proxy");
    println!("  2. Run: lumiere validate --curriculum curricula/example.toml");
    println!("  3. Run: lumiere levels");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# lumiere configuration

default_voice = "Kore"
partner_voice = "Fenrir"
# Speak "Correct" / "Incorrect" after quiz answers.
cues = true
unlock_code = "ENGLISH2025"
# state_path = "${HOME}/.local/share/lumiere/state.json"
# curriculum = "curricula/example.toml"

[service]
base_url = "http://localhost:3000"
timeout_secs = 30
"#;

const EXAMPLE_CURRICULUM: &str = r#"[curriculum]
name = "Example Curriculum"

[[levels]]
id = "travel"
title = "Travel"
subtitle = "Getting Around"
description = "Words for airports and hotels."
icon = "✈️"

[[levels.words]]
id = "t1"
headword = "Boarding pass"
translation = "登机牌"
pronunciation = "/ˈbɔː.dɪŋ ˌpɑːs/"
example = "Please show your boarding pass at the gate."
example_translation = "请在登机口出示您的登机牌。"

[[levels.words]]
id = "t2"
headword = "Reservation"
translation = "预订"
pronunciation = "/ˌrez.əˈveɪ.ʃən/"
example = "I have a reservation under the name Li."
example_translation = "我用李的名字预订了。"

[[levels.scenarios]]
id = "hotel"
title = "Checking In"
description = "Arriving at a hotel."

[[levels.scenarios.lines]]
speaker = "Guest"
text = "Hi, I have a reservation for tonight."
translation = "你好，我预订了今晚的房间。"
avatar = "🧳"

[[levels.scenarios.lines]]
speaker = "Clerk"
text = "Welcome! May I see your ID, please?"
translation = "欢迎！请出示您的证件。"
avatar = "🛎️"
"#;
