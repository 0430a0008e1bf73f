//! Builds the grading form for one student's submission.
//!
//! The form opens with the shared grading instructions, asks the grader to
//! confirm they read the task summary, then asks for a severity rating of
//! every test the student reported.

use crate::parser::{Submission, clean_markdown};
use crate::roster::Student;
use crate::services::forms_api::{
    BatchUpdateRequest, ChoiceOption, ChoiceQuestion, ChoiceType, CreateItem, FormInfo, Item,
    Location, NewForm, Question, QuestionItem, UpdateFormInfo, UpdateRequest,
};

pub const ACKNOWLEDGE_TITLE: &str = "I have read and understood the task and model description.";

/// Severity scale offered for every test.
pub const SEVERITY_OPTIONS: [&str; 5] = [
    "1: The model does not fail on this test enough for me to consider it a bug.",
    "2: It fails enough that I think this is a minor bug.",
    "3: This is a bug that is worth investigating and fixing.",
    "4: This is a severe bug. I may consider not using this model in production due to this.",
    "5: This is so severe that no model with this bug should be in production.",
];

/// Title information for the student's form, e.g. `A1-grading - #3`.
pub fn new_form(title: &str, student: &Student) -> NewForm {
    NewForm {
        info: FormInfo {
            title: Some(format!("{title} - #{}", student.id)),
            document_title: Some(format!("{title}-{}-{}", student.id, student.handle)),
            description: None,
        },
    }
}

/// The edits that turn an empty form into the grading questionnaire.
pub fn grading_questions(instruction: &str, submission: &Submission) -> BatchUpdateRequest {
    let mut requests = vec![
        UpdateRequest::UpdateFormInfo(UpdateFormInfo {
            info: FormInfo {
                description: Some(instruction.to_string()),
                ..Default::default()
            },
            update_mask: "description".to_string(),
        }),
        UpdateRequest::CreateItem(CreateItem {
            item: radio_item(
                ACKNOWLEDGE_TITLE.to_string(),
                clean_markdown(&submission.summary),
                &["Yes"],
            ),
            location: Location { index: 0 },
        }),
    ];

    // Empty blocks are skipped but keep their number, so labels match the document.
    let mut next_index = 1;
    for (position, raw) in submission.tests.iter().enumerate() {
        let cleaned = clean_markdown(raw);
        if cleaned.is_empty() {
            continue;
        }
        let text = format!("Test {}: {cleaned}", position + 1);
        let heading = text.lines().next().unwrap_or_default();

        requests.push(UpdateRequest::CreateItem(CreateItem {
            item: radio_item(
                format!("Rating: [{heading}]. Do you think this test has exposed a severe model bug?"),
                format!("----\n\n {text} \n\n---\n"),
                &SEVERITY_OPTIONS,
            ),
            location: Location { index: next_index },
        }));
        next_index += 1;
    }

    BatchUpdateRequest {
        include_form_in_response: true,
        requests,
    }
}

fn radio_item(title: String, description: String, options: &[&str]) -> Item {
    Item {
        title,
        description,
        question_item: QuestionItem {
            question: Question {
                required: true,
                choice_question: ChoiceQuestion {
                    kind: ChoiceType::Radio,
                    options: options
                        .iter()
                        .map(|value| ChoiceOption {
                            value: value.to_string(),
                        })
                        .collect(),
                },
            },
        },
    }
}
