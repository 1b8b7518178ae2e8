use std::io::{self, stderr, stdin, stdout, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use inflammation_quiz::{
    Arity, Assessment, Breakdown, Error, InflammationResult, QuestionSet, QuizResponses,
    ScoreTable, Tier, QUESTIONS,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Question set to use instead of the embedded one
    #[arg(long)]
    questions: Option<PathBuf>,
    /// Print the result as JSON; the questions go to stderr
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    total_score: u32,
    tier: Tier,
    breakdown: &'a Breakdown,
    result: &'static InflammationResult,
}

fn main() -> Result<(), Error> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(stderr)
        .init();
    let args = Args::parse();

    let questions = match &args.questions {
        Some(path) => {
            info!(path = %path.display(), "loading question set");
            QuestionSet::load(path)?
        }
        None => QUESTIONS.clone(),
    };
    let table = ScoreTable::from(&questions);

    let mut out: Box<dyn Write> = if args.json {
        Box::new(stderr())
    } else {
        Box::new(stdout())
    };
    let mut lines = stdin().lock().lines();
    let mut responses = QuizResponses::new();

    for question in questions.questions() {
        writeln!(out, "{}", question.prompt)?;
        for (index, option) in question.options.iter().enumerate() {
            writeln!(out, "  {} => {}", index + 1, option.label)?;
        }
        if question.arity() == Arity::Multiple {
            writeln!(out, "(um ou mais números separados por vírgula)")?;
        }
        loop {
            let line = lines.next().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input ended before the quiz was finished",
                )
            })??;
            match question.parse_selection(&line) {
                Some(answer) => {
                    responses.insert(question.id.clone(), answer);
                    break;
                }
                None => writeln!(out, "Responda com o número de uma das opções.")?,
            }
        }
        writeln!(out)?;
    }

    let breakdown = table.breakdown(&responses)?;
    let result = breakdown.result();
    if args.json {
        let report = Report {
            total_score: breakdown.total(),
            tier: breakdown.tier(),
            breakdown: &breakdown,
            result,
        };
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("Pontuação: {}", breakdown.total());
        println!("{} {}", result.icon, result.title);
        println!("{}", result.description);
        for recommendation in result.recommendations {
            println!("  - {}", recommendation);
        }
    }
    Ok(())
}
