use anyhow::{Context, Result};
use std::fs::File;
use tracing::{debug, info};

use crate::scoring::band::{PERCENTILES, band_score};
use crate::scoring::types::{ScoreRow, ScoreSummary, ScoredStudent};
use crate::scoring::utility::percentile;

/// Reads the returned-scores CSV at `path`.
pub fn load_score_rows(path: &str) -> Result<Vec<ScoreRow>> {
    let file = File::open(path).with_context(|| format!("failed to open scores '{path}'"))?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: ScoreRow = result.with_context(|| format!("malformed score row in '{path}'"))?;
        rows.push(row);
    }

    debug!(path, count = rows.len(), "Score rows loaded");
    Ok(rows)
}

/// Computes class cut points over the present ratings and scores each row.
///
/// Rows without a rating are kept but receive neither a peer score nor a
/// total.
pub fn aggregate_scores(rows: &[ScoreRow]) -> ScoreSummary {
    let ratings: Vec<f64> = rows.iter().filter_map(ScoreRow::rating).collect();
    let cut_points = cut_points(&ratings);

    let students = rows
        .iter()
        .map(|row| {
            let peer_score = match (row.rating(), &cut_points) {
                (Some(rating), Some(cuts)) => band_score(rating, cuts),
                _ => None,
            };
            ScoredStudent {
                id: row.id,
                handle: row.handle.clone(),
                name: row.name.clone(),
                base_score: row.base_score,
                peer_rating: row.rating(),
                peer_score,
                total_score: peer_score.map(|p| row.base_score + f64::from(p)),
                feedback: row.feedback.clone(),
            }
        })
        .collect::<Vec<_>>();

    let unrated = students.iter().filter(|s| s.peer_score.is_none()).count();
    info!(
        students = students.len(),
        rated = ratings.len(),
        unrated,
        cut_points = ?cut_points,
        "Scores aggregated"
    );

    ScoreSummary {
        cut_points,
        students,
    }
}

fn cut_points(ratings: &[f64]) -> Option<[f64; 5]> {
    let mut cuts = [0.0; 5];
    for (cut, &p) in cuts.iter_mut().zip(PERCENTILES.iter()) {
        *cut = percentile(ratings, p)?;
    }
    Some(cuts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn row(id: u32, base: f64, rating: Option<f64>) -> ScoreRow {
        ScoreRow {
            id,
            handle: format!("s{id}"),
            name: format!("Student, {id}"),
            base_score: base,
            peer_rating: rating,
            feedback: None,
        }
    }

    #[test]
    fn test_aggregate_reference_example() {
        let rows: Vec<ScoreRow> = (1..=5).map(|i| row(i, 70.0, Some(i as f64))).collect();

        let summary = aggregate_scores(&rows);

        assert_eq!(summary.cut_points, Some([1.0, 2.0, 3.0, 4.0, 5.0]));
        let scores: Vec<Option<u32>> = summary.students.iter().map(|s| s.peer_score).collect();
        assert_eq!(scores, vec![Some(5), Some(10), Some(15), Some(20), Some(25)]);
        assert_eq!(summary.students[2].total_score, Some(85.0));
    }

    #[test]
    fn test_top_rating_gets_top_band() {
        let rows = vec![row(1, 0.0, Some(2.2)), row(2, 0.0, Some(4.8)), row(3, 0.0, Some(3.1))];

        let summary = aggregate_scores(&rows);

        assert_eq!(summary.students[1].peer_score, Some(25));
        assert_eq!(summary.students[0].peer_score, Some(5));
    }

    #[test]
    fn test_missing_ratings_excluded_and_unscored() {
        let rows = vec![
            row(1, 60.0, Some(1.0)),
            row(2, 60.0, None),
            row(3, 60.0, Some(f64::NAN)),
            row(4, 60.0, Some(5.0)),
        ];

        let summary = aggregate_scores(&rows);

        assert_eq!(summary.cut_points, Some([1.0, 2.0, 3.0, 4.0, 5.0]));
        assert_eq!(summary.students.len(), 4);
        for missing in &summary.students[1..3] {
            assert_eq!(missing.peer_rating, None);
            assert_eq!(missing.peer_score, None);
            assert_eq!(missing.total_score, None);
        }
        assert_eq!(summary.students[3].total_score, Some(85.0));
    }

    #[test]
    fn test_no_ratings_at_all() {
        let rows = vec![row(1, 50.0, None), row(2, 40.0, None)];

        let summary = aggregate_scores(&rows);

        assert_eq!(summary.cut_points, None);
        assert!(summary.students.iter().all(|s| s.peer_score.is_none()));
    }

    #[test]
    fn test_load_score_rows_with_empty_cells() {
        let path = format!("{}/peer_grader_scores.csv", env::temp_dir().display());
        fs::write(
            &path,
            "idx,andrewid,name,score,peer_rating,feedback\n\
             1,alice,\"Smith, Alice\",70,3.5,Nice tests\n\
             2,bob,\"Jones, Bob\",65,,\n",
        )
        .unwrap();

        let rows = load_score_rows(&path).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].peer_rating, Some(3.5));
        assert_eq!(rows[0].feedback.as_deref(), Some("Nice tests"));
        assert_eq!(rows[1].peer_rating, None);
        assert_eq!(rows[1].feedback, None);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_score_rows_missing_base_column_fails() {
        let path = format!("{}/peer_grader_scores_bad.csv", env::temp_dir().display());
        fs::write(&path, "idx,andrewid,name,peer_rating\n1,alice,A,3\n").unwrap();

        assert!(load_score_rows(&path).is_err());

        fs::remove_file(&path).unwrap();
    }
}
