//! The `lumiere quiz` command.

use std::sync::Arc;

use anyhow::{Context, Result};

use lumiere_core::engine::{Question, QuizEngine};
use lumiere_core::model::VocabularyItem;
use lumiere_core::random::StdRandom;
use lumiere_core::traits::CuePlayer;

use crate::console::Prompt;
use crate::context::AppContext;

/// Typed at the prompt to hear the word instead of answering.
const LISTEN: &str = "s";

pub async fn execute(
    ctx: &AppContext,
    level_id: Option<&str>,
    mistakes: bool,
    seed: Option<u64>,
) -> Result<()> {
    let (title, items): (String, Vec<VocabularyItem>) = if mistakes {
        let items = ctx
            .ledger
            .items(&ctx.curriculum)
            .context("failed to read the mistake book")?
            .into_iter()
            .cloned()
            .collect();
        ("Mistake review".to_string(), items)
    } else {
        let id = level_id.context("a level is required (use --level)")?;
        let level = ctx.open_level(id)?;
        (level.title.clone(), level.items.clone())
    };

    if items.is_empty() {
        println!("Nothing to quiz.");
        return Ok(());
    }

    let speech = ctx.speech()?;
    let cues: Arc<dyn CuePlayer> = Arc::new(speech.playback.clone());
    let random = match seed {
        Some(seed) => StdRandom::seeded(seed),
        None => StdRandom::from_os(),
    };

    // Distractors may come from other levels when a level is too small.
    let pool: Vec<VocabularyItem> = ctx.curriculum.items().cloned().collect();
    let mut engine = QuizEngine::new(ctx.ledger.clone(), cues)
        .with_random(random)
        .with_fallback_pool(pool);

    let mut session = engine.generate_session(&items);
    let mut prompt = Prompt::stdin();
    println!("{title}: {} question(s)", session.len());

    while let Some(question) = session.current().cloned() {
        println!();
        println!("Question {} of {}", session.cursor() + 1, session.len());
        print_question(&question);

        let input = loop {
            match prompt.ask("> ").await? {
                Some(input) if input == LISTEN => {
                    speech.playback.speak_default(&question.item.headword).await;
                }
                other => break other,
            }
        };
        let Some(input) = input else {
            println!("\nQuiz abandoned.");
            speech.playback.flush().await;
            return Ok(());
        };
        let answer = resolve_choice(&question, &input);

        let outcome = engine.submit_answer(&mut session, &answer)?;
        if outcome.is_correct {
            println!("Correct!");
        } else {
            println!("Incorrect. The answer is: {}", outcome.correct_answer);
        }
        engine.advance(&mut session)?;
    }

    if let Some(summary) = session.summary() {
        println!();
        println!(
            "Score: {}/{} ({:.0}%)",
            summary.score,
            summary.total,
            summary.accuracy * 100.0
        );
        if summary.score < summary.total {
            println!("Missed words were added to the mistake book.");
        }
    }

    speech.playback.flush().await;
    Ok(())
}

fn print_question(question: &Question) {
    if question.is_choice() {
        println!("What does \"{}\" mean?", question.prompt());
        for (i, option) in question.options().iter().enumerate() {
            println!("  {}. {option}", i + 1);
        }
    } else {
        println!("Type the English word for: {}", question.prompt());
    }
    println!("  ({LISTEN}) hear the word");
}

/// A number picks the matching option of a choice question.
fn resolve_choice(question: &Question, input: &str) -> String {
    if question.is_choice() {
        if let Ok(n) = input.parse::<usize>() {
            if let Some(option) = n.checked_sub(1).and_then(|i| question.options().get(i)) {
                return option.clone();
            }
        }
    }
    input.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumiere_core::engine::QuestionKind;

    fn item() -> VocabularyItem {
        VocabularyItem {
            id: "w101".into(),
            headword: "Ambition".into(),
            translation: "雄心".into(),
            pronunciation: String::new(),
            example: String::new(),
            example_translation: String::new(),
            level_id: "lvl-1".into(),
        }
    }

    #[test]
    fn numbers_pick_choice_options() {
        let question = Question {
            item: item(),
            kind: QuestionKind::Choice {
                options: vec!["利益".into(), "雄心".into()],
            },
        };
        assert_eq!(resolve_choice(&question, "2"), "雄心");
        assert_eq!(resolve_choice(&question, "0"), "0");
        assert_eq!(resolve_choice(&question, "9"), "9");
        assert_eq!(resolve_choice(&question, "雄心"), "雄心");
    }

    #[test]
    fn production_answers_pass_through() {
        let question = Question {
            item: item(),
            kind: QuestionKind::Production,
        };
        assert_eq!(resolve_choice(&question, "1"), "1");
    }
}
