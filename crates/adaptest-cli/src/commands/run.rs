//! The `adaptest run` command: an interactive adaptive session.
//!
//! This is the presentation layer of the system. It renders one question
//! per slot, measures the answer time, feeds every answer into the engine
//! exactly once, and treats an empty selection as the completion signal.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use comfy_table::Table;

use adaptest_core::engine::{AdaptiveEngine, AnswerOutcome, EngineConfig, SelectedQuestion};
use adaptest_core::model::Question;
use adaptest_core::parser;

use super::report::print_report;

pub fn execute(bank_path: PathBuf, max_questions: usize, output: PathBuf) -> Result<()> {
    anyhow::ensure!(max_questions >= 1, "max-questions must be at least 1");

    let bank = parser::parse_question_bank(&bank_path)?;
    for warning in parser::validate_bank(&bank) {
        eprintln!("WARNING: {}", warning.message);
    }

    let config = EngineConfig {
        max_questions,
        ..EngineConfig::default()
    };
    let mut engine = AdaptiveEngine::with_config(bank.pool, config);

    println!(
        "{} — {} questions in pool, up to {} will be asked\n",
        bank.name,
        engine.pool().len(),
        max_questions
    );

    let stdin = io::stdin();
    while let Some(selected) = engine.next_question() {
        print_question(&selected, engine.attempted() + 1, max_questions);

        let started = Instant::now();
        let Some(label) = read_answer(&mut stdin.lock(), &selected.question)? else {
            println!("\nInput closed, ending the session early.");
            break;
        };
        let time_taken_secs = started.elapsed().as_secs_f64();

        let is_correct = selected.question.is_correct_choice(&label);
        let outcome = engine.process_answer(&selected, is_correct, time_taken_secs);
        print_feedback(&selected.question, &outcome, max_questions);
    }

    match engine.final_report() {
        None => {
            println!("No questions answered, nothing to report.");
        }
        Some(report) => {
            println!("\nSession complete.\n");
            print_report(&report);

            std::fs::create_dir_all(&output)?;
            let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
            let path = output.join(format!("report-{timestamp}.json"));
            report.save_json(&path)?;
            println!("Report saved to: {}", path.display());
        }
    }

    Ok(())
}

fn print_question(selected: &SelectedQuestion, number: usize, max_questions: usize) {
    println!(
        "Question {number}/{max_questions}  (topic: {}, difficulty {:.2})",
        selected.question.topic(),
        selected.question.difficulty()
    );
    println!("{}\n", selected.question.prompt());

    let mut table = Table::new();
    for (label, text) in selected.question.options() {
        table.add_row(vec![label.clone(), text.clone()]);
    }
    println!("{table}");
}

/// Read a valid option label from the input, or `None` on EOF.
fn read_answer(input: &mut impl BufRead, question: &Question) -> Result<Option<String>> {
    let labels: Vec<&str> = question.options().keys().map(String::as_str).collect();
    loop {
        print!("Your answer [{}]: ", labels.join("/"));
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let answer = line.trim();
        if question.options().contains_key(answer) {
            return Ok(Some(answer.to_string()));
        }
        let upper = answer.to_uppercase();
        if question.options().contains_key(&upper) {
            return Ok(Some(upper));
        }
        println!("Please answer with one of: {}", labels.join(", "));
    }
}

fn print_feedback(question: &Question, outcome: &AnswerOutcome, max_questions: usize) {
    if outcome.is_correct {
        println!(
            "\nCorrect! +{} points (x{:.2} multiplier, {:.1}s)",
            outcome.points_earned, outcome.multiplier, outcome.time_taken_secs
        );
    } else {
        let answer_text = question
            .options()
            .get(question.answer())
            .map(String::as_str)
            .unwrap_or_default();
        println!(
            "\nIncorrect. The correct answer was {}) {}",
            question.answer(),
            answer_text
        );
    }
    if !question.explanation().is_empty() {
        println!("Explanation: {}", question.explanation());
    }
    println!(
        "Ability {:.2} | Target difficulty {:.2} | Score {} | {}/{} answered\n",
        outcome.ability,
        outcome.target_difficulty,
        outcome.total_points,
        outcome.attempted,
        max_questions
    );
}
