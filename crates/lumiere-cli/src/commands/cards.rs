//! The `lumiere cards` command: flashcard study.

use anyhow::Result;

use lumiere_core::flashcard::FlashcardDeck;

use crate::console::Prompt;
use crate::context::AppContext;

const HELP: &str = "[enter] flip  (n)ext  (p)rev  (s)peak word  (x) speak example  (e)xplain  (q)uit";

pub async fn execute(ctx: &AppContext, level_id: &str) -> Result<()> {
    let level = ctx.open_level(level_id)?;
    let mut deck = FlashcardDeck::new(level.items.clone());
    if deck.is_empty() {
        println!("{} has no words.", level.title);
        return Ok(());
    }

    let speech = ctx.speech()?;
    let mut prompt = Prompt::stdin();
    println!("{}: {} ({} cards)", level.title, level.subtitle, deck.len());
    println!("{HELP}");

    loop {
        let Some(card) = deck.current() else { break };
        println!();
        println!("[{}] {}  {}", deck.position(), card.headword, card.pronunciation);
        if deck.is_revealed() {
            println!("    {}", card.translation);
            if !card.example.is_empty() {
                println!("    e.g. {}", card.example);
                println!("         {}", card.example_translation);
            }
        }

        let Some(input) = prompt.ask("> ").await? else { break };
        match input.as_str() {
            "" | "f" => deck.flip(),
            "n" => {
                if !deck.next() {
                    println!("That was the last card.");
                }
            }
            "p" => {
                if !deck.previous() {
                    println!("Already at the first card.");
                }
            }
            "s" => {
                let text = card.headword.clone();
                speech.playback.speak_default(&text).await;
            }
            "x" if !card.example.is_empty() => {
                let text = card.example.clone();
                speech.playback.speak_default(&text).await;
            }
            "e" => {
                let phrase = if card.example.is_empty() {
                    card.headword.clone()
                } else {
                    card.example.clone()
                };
                println!("    ...");
                println!("    {}", speech.explainer.explain(&phrase).await);
            }
            "q" => break,
            _ => println!("{HELP}"),
        }
    }

    Ok(())
}
