//! The `vakya play` command: an interactive exercise session on stdin.
//!
//! The learner works the round with "pick a word, pick a role" commands.
//! Words are referred to either by their number in the word list or by
//! their surface form.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use rand::Rng;

use vakya_client::{ApiClient, MockSentenceSource};
use vakya_core::analysis::WordAnalysis;
use vakya_core::error::ExerciseError;
use vakya_core::exercise::{EngineConfig, EngineState, ExerciseEngine, Round};
use vakya_core::model::{Property, Role};
use vakya_core::session::Route;
use vakya_core::traits::SentenceSource;

use super::{make_rng, open_session, require};

pub async fn execute(config_path: Option<PathBuf>, offline: bool, seed: Option<u64>) -> Result<()> {
    let (config, gate) = open_session(config_path)?;
    require(&gate, Route::Game)?;

    let (source, engine_config): (Box<dyn SentenceSource>, EngineConfig) = if offline {
        (
            Box::new(MockSentenceSource::unavailable()),
            EngineConfig {
                offline_fallback: true,
            },
        )
    } else {
        (Box::new(ApiClient::new(&config)?), config.engine_config())
    };

    let mut engine = ExerciseEngine::new(engine_config);
    let mut rng = make_rng(seed);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_session(
        &mut engine,
        source.as_ref(),
        &mut rng,
        stdin.lock(),
        &mut stdout,
    )
    .await
}

/// A word reference typed by the learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordRef {
    /// 1-based position in the displayed word list.
    Index(usize),
    /// Surface form.
    Text(String),
}

impl WordRef {
    fn parse(s: &str) -> Self {
        match s.parse::<usize>() {
            Ok(n) => WordRef::Index(n),
            Err(_) => WordRef::Text(s.to_string()),
        }
    }

    fn resolve(&self, round: &Round) -> Option<usize> {
        match self {
            WordRef::Index(n) => round
                .available()
                .get(n.checked_sub(1)?)
                .map(|token| token.id),
            WordRef::Text(text) => round.find_token(text).map(|token| token.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Place(WordRef, Role),
    Select(WordRef),
    To(Role),
    Clear(Role),
    Hints,
    Analyze(Role),
    Put(usize, Property),
    Check,
    Reveal(Property),
    Done,
    Show,
    Next,
    Help,
    Quit,
}

/// Parses one input line. Returns a short usage message on failure.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&verb, args)) = parts.split_first() else {
        return Err("Type `help` for the list of commands.".into());
    };

    let role = |s: &str| Role::from_str(s).map_err(|e| e.to_string());
    let property = |s: &str| Property::from_str(s).map_err(|e| e.to_string());

    match (verb.to_lowercase().as_str(), args) {
        ("place" | "p", [word, r]) => Ok(Command::Place(WordRef::parse(word), role(*r)?)),
        ("place" | "p", _) => Err("usage: place <word> <role>".into()),
        ("select", [word]) => Ok(Command::Select(WordRef::parse(word))),
        ("select", _) => Err("usage: select <word>".into()),
        ("to", [r]) => Ok(Command::To(role(*r)?)),
        ("clear", [r]) => Ok(Command::Clear(role(*r)?)),
        ("to" | "clear", _) => Err(format!("usage: {verb} <role>")),
        ("hints" | "hint", []) => Ok(Command::Hints),
        ("analyze" | "analyse", [r]) => Ok(Command::Analyze(role(*r)?)),
        ("analyze" | "analyse", _) => Err("usage: analyze <role>".into()),
        ("put", [n, slot]) => {
            let n = n
                .parse::<usize>()
                .map_err(|_| format!("'{n}' is not an option number"))?;
            Ok(Command::Put(n, property(*slot)?))
        }
        ("put", _) => Err("usage: put <option#> <slot>".into()),
        ("check", []) => Ok(Command::Check),
        ("reveal", [slot]) => Ok(Command::Reveal(property(*slot)?)),
        ("reveal", _) => Err("usage: reveal <slot>".into()),
        ("done", []) => Ok(Command::Done),
        ("show" | "ls", []) => Ok(Command::Show),
        ("next" | "n", []) => Ok(Command::Next),
        ("help" | "?", []) => Ok(Command::Help),
        ("quit" | "exit" | "q", []) => Ok(Command::Quit),
        _ => Err(format!(
            "unknown command '{}'. Type `help` for the list of commands.",
            line.trim()
        )),
    }
}

const HELP: &str = "\
Commands:
  place <word> <role>     put a word (number or text) into subject, object or verb
  select <word>           pick a word, then
  to <role>               drop the picked word into a role
  clear <role>            send a role's word back to the word list
  hints                   show grammatical hints
  analyze <role>          drill the properties of the word playing a role
  put <option#> <slot>    (analysis) drop an option onto a slot
  check                   (analysis) check placed options
  reveal <slot>           (analysis) show or hide a slot's answer
  done                    (analysis) close the analysis
  show                    redraw the board
  next                    load a new sentence
  quit                    leave";

/// Runs the interactive loop until `quit` or end of input.
pub async fn run_session<R, I, O>(
    engine: &mut ExerciseEngine,
    source: &dyn SentenceSource,
    rng: &mut R,
    input: I,
    out: &mut O,
) -> Result<()>
where
    R: Rng,
    I: BufRead,
    O: Write,
{
    engine.load_next(source, rng).await;
    render(engine, out)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Show => render(engine, out)?,
            Command::Next => {
                engine.load_next(source, rng).await;
                render(engine, out)?;
            }
            command => apply(engine, command, rng, out)?,
        }
    }
    Ok(())
}

/// Applies a command that works on the current round. Every command goes
/// through the engine, which refuses them unless a round is ready.
fn apply<R: Rng, O: Write>(
    engine: &mut ExerciseEngine,
    command: Command,
    rng: &mut R,
    out: &mut O,
) -> Result<()> {
    if let Err(ExerciseError::NotReady) = engine.ready_round() {
        writeln!(out, "No sentence loaded. Type `next` to try again.")?;
        return Ok(());
    }

    match command {
        Command::Place(word, role) => {
            let id = engine.round().and_then(|round| word.resolve(round));
            let placed = id.is_some_and(|id| engine.place_word(id, role));
            if !placed {
                writeln!(out, "No such word.")?;
            }
            render_board(engine.ready_round()?, out)?;
        }
        Command::Select(word) => {
            let round = engine.ready_round()?;
            match word.resolve(round) {
                Some(id) if round.select_token(id) => {
                    if let Some(token) = round.selected() {
                        writeln!(out, "Picked {}. Now: to <role>", token.text)?;
                    }
                }
                _ => writeln!(out, "No such word.")?,
            }
        }
        Command::To(role) => {
            let round = engine.ready_round()?;
            if !round.place_selected(role) {
                writeln!(out, "Pick a word first with `select <word>`.")?;
            }
            render_board(round, out)?;
        }
        Command::Clear(role) => {
            if !engine.clear_role(role) {
                writeln!(out, "The {role} slot is already empty.")?;
            }
            render_board(engine.ready_round()?, out)?;
        }
        Command::Hints => {
            let hints = engine.show_hints()?;
            for role in Role::ALL {
                writeln!(out, "{}: {}", role.title(), hints.get(role))?;
            }
        }
        Command::Analyze(role) => match engine.analyze_word(role, rng) {
            Ok(analysis) => render_analysis(analysis, out)?,
            Err(e) => writeln!(out, "Cannot analyze: {e}.")?,
        },
        Command::Put(n, slot) => match engine.ready_round()?.analysis_mut() {
            Some(analysis) => {
                let placed = n
                    .checked_sub(1)
                    .is_some_and(|index| analysis.place_option(index, slot));
                if !placed {
                    writeln!(out, "That option does not fit the {slot} slot.")?;
                }
                render_analysis(analysis, out)?;
            }
            None => no_analysis(out)?,
        },
        Command::Check => match engine.ready_round()?.analysis_mut() {
            Some(analysis) => {
                let feedback = analysis.check_answers();
                writeln!(out, "{feedback}")?;
            }
            None => no_analysis(out)?,
        },
        Command::Reveal(slot) => match engine.ready_round()?.analysis_mut() {
            Some(analysis) => {
                analysis.toggle_reveal(slot);
                render_analysis(analysis, out)?;
            }
            None => no_analysis(out)?,
        },
        Command::Done => {
            let round = engine.ready_round()?;
            round.close_analysis();
            render_board(round, out)?;
        }
        Command::Show | Command::Next | Command::Help | Command::Quit => {}
    }
    Ok(())
}

fn no_analysis<O: Write>(out: &mut O) -> Result<()> {
    writeln!(out, "No word is being analyzed. Use `analyze <role>` first.")?;
    Ok(())
}

fn render<O: Write>(engine: &ExerciseEngine, out: &mut O) -> Result<()> {
    match (engine.state(), engine.round()) {
        (EngineState::Ready, Some(round)) => {
            writeln!(out, "Sentence: {}", round.sentence())?;
            if round.is_fallback() {
                writeln!(
                    out,
                    "(sentence service unavailable, playing the built-in sentence)"
                )?;
            }
            render_board(round, out)
        }
        (EngineState::Error, _) => {
            if let Some(message) = engine.error_message() {
                writeln!(out, "{message}")?;
            }
            writeln!(out, "Type `next` to try again.")?;
            Ok(())
        }
        _ => {
            writeln!(out, "Loading...")?;
            Ok(())
        }
    }
}

fn render_board<O: Write>(round: &Round, out: &mut O) -> Result<()> {
    let words: Vec<String> = round
        .available()
        .iter()
        .enumerate()
        .map(|(i, token)| format!("{}) {}", i + 1, token.text))
        .collect();
    if words.is_empty() {
        writeln!(out, "Words: (all placed)")?;
    } else {
        writeln!(out, "Words: {}", words.join("  "))?;
    }

    let slots: Vec<String> = Role::ALL
        .iter()
        .map(|&role| {
            let text = round.placed(role).map_or("___", |t| t.text.as_str());
            format!("{}: {}", role.title(), text)
        })
        .collect();
    writeln!(out, "{}", slots.join(" | "))?;

    if let Some(feedback) = round.feedback() {
        writeln!(out, "{feedback}")?;
    }
    Ok(())
}

fn render_analysis<O: Write>(analysis: &WordAnalysis, out: &mut O) -> Result<()> {
    writeln!(out, "{}: {}", analysis.title(), analysis.word().form())?;

    let options: Vec<String> = analysis
        .options()
        .iter()
        .enumerate()
        .map(|(i, option)| format!("{}) {}", i + 1, option.text))
        .collect();
    if !options.is_empty() {
        writeln!(out, "Options: {}", options.join("  "))?;
    }

    for slot in analysis.slots() {
        let name = slot.to_string();
        let placed = analysis.placement(slot).map_or("___", |o| o.text.as_str());
        if analysis.is_revealed(slot) {
            writeln!(out, "  {name:<8} {placed}  (answer: {})", analysis.answer(slot))?;
        } else {
            writeln!(out, "  {name:<8} {placed}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use vakya_core::feedback::{CORRECT_MESSAGE, INCORRECT_MESSAGE, LOAD_ERROR_MESSAGE};

    use super::*;

    async fn play(script: &str, fallback: bool) -> String {
        let mut engine = ExerciseEngine::new(EngineConfig {
            offline_fallback: fallback,
        });
        let source = MockSentenceSource::unavailable();
        let mut rng = StdRng::seed_from_u64(5);
        let mut out = Vec::new();
        run_session(
            &mut engine,
            &source,
            &mut rng,
            Cursor::new(script.to_string()),
            &mut out,
        )
        .await
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse_command("place 2 verb"),
            Ok(Command::Place(WordRef::Index(2), Role::Verb))
        );
        assert_eq!(
            parse_command("  P रामः subj "),
            Ok(Command::Place(WordRef::Text("रामः".into()), Role::Subject))
        );
        assert_eq!(
            parse_command("put 3 gender"),
            Ok(Command::Put(3, Property::Gender))
        );
        assert_eq!(parse_command("hints"), Ok(Command::Hints));
        assert_eq!(parse_command("q"), Ok(Command::Quit));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!(parse_command("place रामः").is_err());
        assert!(parse_command("place रामः adverb")
            .unwrap_err()
            .contains("unknown role"));
        assert!(parse_command("put x root").is_err());
        assert!(parse_command("dance").unwrap_err().contains("help"));
        assert!(parse_command("").is_err());
    }

    #[tokio::test]
    async fn fallback_round_is_solvable() {
        let out = play("place रामः subject\nplace गच्छति verb\nquit\n", true).await;
        assert!(out.contains("Sentence: रामः गच्छति"));
        assert!(out.contains("built-in sentence"));
        assert!(out.contains(CORRECT_MESSAGE));
        assert!(out.contains("Subject: रामः | Object: ___ | Verb: गच्छति"));
    }

    #[tokio::test]
    async fn vacating_the_subject_drops_the_verdict() {
        let out = play(
            "place रामः subject\nplace गच्छति verb\nplace रामः object\n",
            true,
        )
        .await;
        let board = "Subject: ___ | Object: रामः | Verb: गच्छति";
        let (before, after) = out.split_once(board).unwrap();
        assert!(before.contains(CORRECT_MESSAGE));
        assert!(!after.contains(CORRECT_MESSAGE));
        assert!(!after.contains(INCORRECT_MESSAGE));
    }

    #[tokio::test]
    async fn swapped_words_are_corrected() {
        let out = play("place रामः verb\nplace गच्छति subject\n", true).await;
        assert!(out.contains(INCORRECT_MESSAGE));
        assert!(!out.contains(CORRECT_MESSAGE));
    }

    #[tokio::test]
    async fn select_then_drop() {
        let out = play(
            "select रामः\nto subject\nselect गच्छति\nto verb\n",
            true,
        )
        .await;
        assert!(out.contains("Picked रामः"));
        assert!(out.contains(CORRECT_MESSAGE));
    }

    #[tokio::test]
    async fn hints_and_missing_object() {
        let out = play("hints\nanalyze object\n", true).await;
        assert!(out.contains("Subject: Gender: masculine, Number: singular"));
        assert!(out.contains("Object: No object in this sentence"));
        assert!(out.contains("Cannot analyze: this sentence has no object."));
    }

    #[tokio::test]
    async fn analysis_flow() {
        let out = play(
            "analyze verb\nreveal class\ncheck\ndone\nput 1 root\n",
            true,
        )
        .await;
        assert!(out.contains("Verb Analysis: गच्छति"));
        assert!(out.contains("(answer: 1)"));
        // nothing placed yet, so nothing is wrong
        assert!(out.contains(CORRECT_MESSAGE));
        assert!(out.contains("No word is being analyzed"));
    }

    #[tokio::test]
    async fn load_error_without_fallback() {
        let out = play("place 1 subject\n", false).await;
        assert!(out.contains(LOAD_ERROR_MESSAGE));
        assert!(out.contains("No sentence loaded"));
    }
}
