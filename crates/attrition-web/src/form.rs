//! Interactive front-end: an HTML form at `/ui`.
//!
//! Every submission re-renders the whole page with the submitted values and
//! a result block. Nothing is kept between requests.

use attrition_ai::assess;
use attrition_core::{Department, EmployeeProfile, PredictionResult, SalaryLevel};
use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::Html;
use serde::Deserialize;
use tracing::info;

use crate::AppState;
use crate::api::status_for;

const CAPTION: &str = "Probability is the model's estimated chance of the employee leaving.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum YesNo {
    No,
    Yes,
}

impl YesNo {
    fn as_str(self) -> &'static str {
        match self {
            Self::No => "No",
            Self::Yes => "Yes",
        }
    }
}

/// Form fields, named as the page submits them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormValues {
    pub satisfaction_level: f64,
    pub last_evaluation: f64,
    pub number_project: u32,
    pub average_monthly_hours: u32,
    pub time_spend_company: u32,
    pub work_accident: YesNo,
    pub promotion_last_5years: YesNo,
    pub department: String,
    pub salary: String,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            satisfaction_level: 0.5,
            last_evaluation: 0.7,
            number_project: 3,
            average_monthly_hours: 160,
            time_spend_company: 3,
            work_accident: YesNo::No,
            promotion_last_5years: YesNo::No,
            department: Department::Sales.as_str().to_string(),
            salary: SalaryLevel::Low.as_str().to_string(),
        }
    }
}

impl FormValues {
    pub fn to_profile(&self) -> EmployeeProfile {
        EmployeeProfile {
            satisfaction_level: self.satisfaction_level,
            last_evaluation: self.last_evaluation,
            number_project: self.number_project,
            average_monthly_hours: self.average_monthly_hours,
            time_spend_company: self.time_spend_company,
            had_work_accident: self.work_accident == YesNo::Yes,
            promoted_last_5_years: self.promotion_last_5years == YesNo::Yes,
            department: self.department.clone(),
            salary_level: self.salary.clone(),
        }
    }
}

enum Outcome {
    Scored(PredictionResult),
    Rejected(String),
}

pub(crate) async fn show() -> Html<String> {
    Html(render(&FormValues::default(), None))
}

pub(crate) async fn submit(
    State(state): State<AppState>,
    form: Result<Form<FormValues>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let values = match form {
        Ok(Form(values)) => values,
        Err(rejection) => {
            info!(status = %rejection.status(), "rejected malformed form submission");
            let page = render(
                &FormValues::default(),
                Some(Outcome::Rejected(rejection.body_text())),
            );
            return (rejection.status(), Html(page));
        }
    };

    match assess(&state.model, &values.to_profile()) {
        Ok(result) => (
            StatusCode::OK,
            Html(render(&values, Some(Outcome::Scored(result)))),
        ),
        Err(err) => {
            let status = status_for(&err);
            let page = render(&values, Some(Outcome::Rejected(err.to_string())));
            (status, Html(page))
        }
    }
}

fn render(values: &FormValues, outcome: Option<Outcome>) -> String {
    let mut page = String::with_capacity(4096);
    page.push_str(HEAD);
    page.push_str("<form method=\"post\" action=\"/ui\">\n");

    page.push_str(&number_field(
        "satisfaction_level",
        "Satisfaction Level",
        &values.satisfaction_level.to_string(),
        "0.0",
        "1.0",
        "0.01",
    ));
    page.push_str(&number_field(
        "last_evaluation",
        "Last Evaluation Score",
        &values.last_evaluation.to_string(),
        "0.0",
        "1.0",
        "0.01",
    ));
    page.push_str(&number_field(
        "number_project",
        "Number of Projects",
        &values.number_project.to_string(),
        "1",
        "10",
        "1",
    ));
    page.push_str(&number_field(
        "average_monthly_hours",
        "Average Monthly Hours",
        &values.average_monthly_hours.to_string(),
        "50",
        "350",
        "1",
    ));
    page.push_str(&number_field(
        "time_spend_company",
        "Years at Company",
        &values.time_spend_company.to_string(),
        "1",
        "20",
        "1",
    ));

    let yes_no = [YesNo::No.as_str(), YesNo::Yes.as_str()];
    page.push_str(&select_field(
        "work_accident",
        "Had Work Accident?",
        &yes_no,
        values.work_accident.as_str(),
    ));
    page.push_str(&select_field(
        "promotion_last_5years",
        "Promotion in Last 5 Years?",
        &yes_no,
        values.promotion_last_5years.as_str(),
    ));

    let departments: Vec<&str> = Department::ALL.iter().map(|d| d.as_str()).collect();
    page.push_str(&select_field(
        "department",
        "Department",
        &departments,
        &values.department,
    ));
    let salaries: Vec<&str> = SalaryLevel::ALL.iter().map(|s| s.as_str()).collect();
    page.push_str(&select_field(
        "salary",
        "Salary Level",
        &salaries,
        &values.salary,
    ));

    page.push_str("<button type=\"submit\">Predict Attrition</button>\n</form>\n");

    match outcome {
        Some(Outcome::Scored(result)) => {
            let class = if result.left { "leave" } else { "stay" };
            page.push_str(&format!(
                "<section class=\"result {class}\">\n<p><strong>{}</strong></p>\n<p class=\"caption\">Note: {CAPTION}</p>\n</section>\n",
                escape(&result.summary())
            ));
        }
        Some(Outcome::Rejected(message)) => {
            page.push_str(&format!(
                "<section class=\"result error\">\n<p>{}</p>\n</section>\n",
                escape(&message)
            ));
        }
        None => {}
    }

    page.push_str("</main>\n</body>\n</html>\n");
    page
}

fn number_field(name: &str, label: &str, value: &str, min: &str, max: &str, step: &str) -> String {
    format!(
        "<label for=\"{name}\">{label}</label>\n<input type=\"number\" id=\"{name}\" name=\"{name}\" value=\"{}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" required>\n",
        escape(value)
    )
}

/// Options come from fixed tables; `selected` is only matched, never echoed.
fn select_field(name: &str, label: &str, options: &[&str], selected: &str) -> String {
    let mut html = format!("<label for=\"{name}\">{label}</label>\n<select id=\"{name}\" name=\"{name}\">\n");
    for option in options {
        let mark = if *option == selected { " selected" } else { "" };
        html.push_str(&format!("<option value=\"{option}\"{mark}>{option}</option>\n"));
    }
    html.push_str("</select>\n");
    html
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Employee Attrition Prediction</title>
<style>
body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }
form { display: grid; grid-template-columns: max-content 1fr; gap: 0.5rem 1rem; }
button { grid-column: 2; justify-self: start; }
.result { margin-top: 1.5rem; padding: 1rem; border-radius: 4px; }
.leave, .error { background: #fde2e1; }
.stay { background: #e1f5e4; }
.caption { font-size: 0.85rem; color: #555; }
</style>
</head>
<body>
<main>
<h1>Employee Attrition Prediction</h1>
<p>Predict whether an employee is likely to leave the company based on their profile.</p>
"#;
