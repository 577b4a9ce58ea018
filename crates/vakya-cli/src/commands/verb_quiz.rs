//! The `vakya verb-quiz` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use vakya_client::ApiClient;
use vakya_core::session::Route;
use vakya_core::traits::VerbQuizSource;
use vakya_core::verb_quiz::VerbQuizRound;

use super::{open_session, require};

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (config, gate) = open_session(config_path)?;
    require(&gate, Route::Game)?;

    let client = ApiClient::new(&config)?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_quiz(&client, stdin.lock(), &mut stdout).await
}

/// Plays quizzes from `source` until the learner quits or input ends.
/// After a correct answer, any input loads the next quiz.
pub async fn run_quiz<I: BufRead, O: Write>(
    source: &dyn VerbQuizSource,
    input: I,
    out: &mut O,
) -> Result<()> {
    let mut lines = input.lines();

    'quizzes: loop {
        let quiz = source
            .fetch_verb_quiz()
            .await
            .context("failed to load a verb quiz")?;
        let mut round = VerbQuizRound::new(quiz);

        writeln!(out, "{}", round.quiz().sentence)?;
        for (i, option) in round.quiz().options.iter().enumerate() {
            writeln!(out, "  {}) {option}", i + 1)?;
        }

        while !round.is_solved() {
            let Some(line) = lines.next() else {
                break 'quizzes;
            };
            let line = line?;
            let choice = line.trim();
            if matches!(choice, "q" | "quit" | "exit") {
                break 'quizzes;
            }
            if choice.is_empty() {
                continue;
            }

            let outcome = match choice.parse::<usize>() {
                Ok(n) if n >= 1 => round.answer_index(n - 1),
                _ => round.answer(choice),
            };
            match outcome {
                Ok(outcome) if outcome.correct => {
                    writeln!(out, "Correct! {}", outcome.message)?;
                }
                Ok(outcome) => writeln!(out, "Not quite. {}", outcome.message)?,
                Err(e) => writeln!(out, "{e}")?,
            }
        }

        writeln!(out, "Press enter for the next quiz, or q to quit.")?;
        let next = lines.next().transpose()?;
        if next.map_or(true, |l| matches!(l.trim(), "q" | "quit" | "exit")) {
            break;
        }
    }
    Ok(())
}
