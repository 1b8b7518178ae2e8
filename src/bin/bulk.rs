use std::fs::File;
use std::io::{stderr, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use inflammation_quiz::{classify, read_bulk, Error, QuestionSet, ScoreTable, Tier, QUESTIONS};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// CSV file with an `id` column followed by one column per question
    path: PathBuf,
    /// Question set to use instead of the embedded one
    #[arg(long)]
    questions: Option<PathBuf>,
    /// Print one JSON object per row
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Scored<'a> {
    id: &'a str,
    total_score: u32,
    tier: Tier,
}

fn main() -> Result<ExitCode, Error> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(stderr)
        .init();
    let args = Args::parse();

    let questions = match &args.questions {
        Some(path) => QuestionSet::load(path)?,
        None => QUESTIONS.clone(),
    };
    let table = ScoreTable::from(&questions);
    let reader = BufReader::new(File::open(&args.path)?);

    let (mut scored, mut failed) = (0usize, 0usize);
    for row in read_bulk(&questions, reader)? {
        match row {
            Ok((id, responses)) => match table.compute(&responses) {
                Ok(total_score) => {
                    scored += 1;
                    let tier = classify(total_score);
                    if args.json {
                        let line = Scored {
                            id: &id,
                            total_score,
                            tier,
                        };
                        println!("{}", serde_json::to_string(&line)?);
                    } else {
                        println!(
                            "id = {}, total_score = {}, tier = {}",
                            id, total_score, tier
                        );
                    }
                }
                Err(e) => {
                    failed += 1;
                    eprintln!(
                        "id = {}, questions = {}, error = {}",
                        id,
                        e.questions().join(","),
                        e
                    );
                }
            },
            Err(e) => {
                failed += 1;
                eprintln!("error = {}", e);
            }
        }
    }

    info!(scored, failed, "bulk scoring finished");
    if failed > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
