//! Text sent to each grader listing the forms they have to fill in.

use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::fmt::Write;

use crate::assign::Assignment;
use crate::roster::Student;

/// Renders one notice block per grader, in assignment order.
///
/// # Errors
///
/// Fails if an assignment references an id that is not on the roster.
pub fn render_notice(roster: &[Student], assignments: &[Assignment]) -> Result<String> {
    let by_id: HashMap<u32, &Student> = roster.iter().map(|s| (s.id, s)).collect();
    let lookup = |id: u32| {
        by_id
            .get(&id)
            .copied()
            .ok_or_else(|| anyhow!("student {id} is not on the roster"))
    };

    let mut text = String::new();
    for assignment in assignments {
        let grader = lookup(assignment.grader)?;

        writeln!(
            text,
            "------------------ {}: {} ----------------------",
            grader.id, grader.handle
        )?;
        writeln!(
            text,
            "Hi {}! You have been assigned to grade the following assignments (forms only accessible if you log into your Andrew account):",
            grader.first_name()
        )?;
        for &gradee in &assignment.gradees {
            writeln!(text, "- {}", lookup(gradee)?.form_url())?;
        }
        text.push_str("Please follow the instructions in the form to grade the assignment.\n\n");
    }

    Ok(text)
}
