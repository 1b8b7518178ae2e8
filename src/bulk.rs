use std::collections::HashSet;
use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::question::{Arity, QuestionSet};
use crate::{Answer, Error, QuizResponses};

/// Separator between the values of a multi-choice cell.
pub const SELECTION_SEPARATOR: char = ';';

/// Reads submissions from a CSV file.
///
/// The first column holds the submission id and the header names every other
/// column after its question id. Multi-choice cells list values separated by
/// `;`, empty cells are unanswered questions. Columns the question set does
/// not know are kept as single answers so that scoring reports them. A
/// column named twice is rejected.
pub fn read_bulk<'a, R: Read + 'a>(
    questions: &'a QuestionSet,
    reader: R,
) -> Result<impl Iterator<Item = Result<(String, QuizResponses), Error>> + 'a, Error> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    if headers.get(0) != Some("id") {
        return Err(Error::Bulk("the first column must be \"id\"".to_string()));
    }
    if let Some(column) = repeated_column(&headers) {
        return Err(Error::Bulk(format!("column {column:?} appears more than once")));
    }
    Ok(reader
        .into_records()
        .map(move |record| parse_row(questions, &headers, &record?)))
}

fn repeated_column(headers: &StringRecord) -> Option<&str> {
    let mut seen = HashSet::new();
    headers.iter().find(|column| !seen.insert(*column))
}

fn parse_row(
    questions: &QuestionSet,
    headers: &StringRecord,
    record: &StringRecord,
) -> Result<(String, QuizResponses), Error> {
    let id = record
        .get(0)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::Bulk(format!("row {} has no id", line(record))))?
        .to_string();

    let mut responses = QuizResponses::new();
    for (question, cell) in headers.iter().zip(record.iter()).skip(1) {
        if cell.is_empty() {
            continue;
        }
        let arity = questions
            .question(question)
            .map(|question| question.arity())
            .unwrap_or(Arity::Single);
        let answer = match arity {
            Arity::Single => Answer::single(cell),
            Arity::Multiple => Answer::multiple(
                cell.split(SELECTION_SEPARATOR)
                    .map(str::trim)
                    .filter(|value| !value.is_empty()),
            ),
        };
        responses.insert(question, answer);
    }
    Ok((id, responses))
}

fn line(record: &StringRecord) -> u64 {
    record.position().map(|position| position.line()).unwrap_or(0)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::scenario_b;
    use crate::{compute_score, QUESTIONS};

    const HEADER: &str = "id,p1,p2,p3,p4,p5,p6,p7,p8,p9,p10,p11,p12,p13,p14,p15,p16,p17,p18,p19";
    const SCENARIO_B: &str = "b,sim,baixos_cansada,intenso,sim,todos_dias,sim,tipo_1_6_7,sim,nenhuma,sim,nenhuma,nenhuma,todos_dias,constantemente_limite,nenhuma,nenhuma,todos_dias,tentei_tudo,nenhum";

    fn rows(csv: &str) -> Vec<Result<(String, QuizResponses), Error>> {
        read_bulk(&QUESTIONS, csv.as_bytes()).unwrap().collect()
    }

    #[test]
    fn test_read_bulk() {
        let csv = format!(
            "{HEADER}\n{SCENARIO_B}\n{}\n",
            SCENARIO_B
                .replacen("b,", "c,", 1)
                .replacen("sim,nenhuma,sim", "sim,acne; rosacea,sim", 1)
        );
        let rows = rows(&csv);
        assert_eq!(rows.len(), 2);

        let (id, responses) = rows[0].as_ref().unwrap();
        assert_eq!(id, "b");
        assert_eq!(responses, &scenario_b());
        assert_eq!(compute_score(responses).unwrap(), 41);

        let (id, responses) = rows[1].as_ref().unwrap();
        assert_eq!(id, "c");
        assert_eq!(
            responses.get("p9"),
            Some(&Answer::multiple(["acne", "rosacea"]))
        );
        assert_eq!(compute_score(responses).unwrap(), 45);
    }

    #[test]
    fn test_empty_cell_is_unanswered() {
        let csv = format!("{HEADER}\n{}\n", SCENARIO_B.replace(",intenso,", ",,"));
        let rows = rows(&csv);
        let (_, responses) = rows[0].as_ref().unwrap();
        assert_eq!(responses.get("p3"), None);
        assert_eq!(compute_score(responses).unwrap_err().questions(), vec!["p3"]);
    }

    #[test]
    fn test_unknown_column_is_kept() {
        let csv = format!("{HEADER},p20\n{SCENARIO_B},sim\n");
        let rows = rows(&csv);
        let (_, responses) = rows[0].as_ref().unwrap();
        assert!(matches!(
            compute_score(responses),
            Err(Error::UnknownQuestion(ref ids)) if ids == &["p20".to_string()]
        ));
    }

    #[test]
    fn test_rejects_repeated_column() {
        let csv = format!(
            "{HEADER},p9\n{}\n",
            SCENARIO_B.replacen("sim,nenhuma,sim", "sim,acne;rosacea,sim", 1) + ",nenhuma"
        );
        match read_bulk(&QUESTIONS, csv.as_bytes()).map(|_| ()) {
            Err(Error::Bulk(message)) => assert!(message.contains("\"p9\"")),
            Err(other) => panic!("unexpected error {other:?}"),
            Ok(()) => panic!("repeated column accepted"),
        }
    }

    #[test]
    fn test_requires_id_column() {
        assert!(matches!(
            read_bulk(&QUESTIONS, "p1,p2\nsim,leve\n".as_bytes()).map(|_| ()),
            Err(Error::Bulk(_))
        ));
    }

    #[test]
    fn test_row_without_id() {
        let rows = rows(&format!("{HEADER}\n{}\n", SCENARIO_B.replacen("b,", ",", 1)));
        assert!(matches!(rows[0], Err(Error::Bulk(_))));
    }

    #[test]
    fn test_ragged_row() {
        let rows = rows(&format!("{HEADER}\nb,sim\n"));
        assert!(matches!(rows[0], Err(Error::Csv(_))));
    }
}
