//! HTML rendering for the form and about pages

use std::fmt::Write;

use predictor_core::logic::features::layout::{
    AGE, ASSIGNMENTS, ATTENDANCE, HOURS_STUDIED, INTERNAL_MARKS, PREVIOUS_SCORE,
};
use predictor_core::logic::features::NumericRange;
use predictor_core::{Gender, InternetAccess, ParentEducation, Prediction};

use crate::models::StudentForm;

/// What to show under the form
pub enum Outcome<'a> {
    None,
    Prediction(&'a Prediction),
    Error { message: String, guidance: &'static str },
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; color: #222; }
nav a { margin-right: 1rem; }
.grid { display: grid; grid-template-columns: 1fr 1fr; gap: 0.75rem 2rem; }
label { display: block; font-weight: 600; margin-bottom: 0.25rem; }
input, select { width: 100%; padding: 0.4rem; box-sizing: border-box; }
button { margin-top: 1rem; padding: 0.6rem 1.5rem; font-size: 1rem; }
.result { margin-top: 2rem; padding: 1rem; border-radius: 6px; }
.pass { background: #e6f6ea; border: 1px solid #6cc07f; }
.fail { background: #fbeaea; border: 1px solid #d77; }
.error { background: #fff4e0; border: 1px solid #e0a040; }
.disabled { background: #f0f0f0; border: 1px dashed #999; }
.bar { height: 1.4rem; margin: 0.3rem 0; color: #fff; padding-left: 0.4rem; white-space: nowrap; }
.bar.p { background: #3a9a55; }
.bar.f { background: #c44; }
table { border-collapse: collapse; margin-top: 1rem; }
td { padding: 0.2rem 1rem 0.2rem 0; }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <nav><a href=\"/\">Predictor</a><a href=\"/about\">About</a></nav>\n\
         {body}\n</body>\n</html>\n",
        title = escape(title),
    )
}

fn select(name: &str, label: &str, options: &[&str], selected: &str) -> String {
    let mut html = format!("<div><label for=\"{name}\">{label}</label><select id=\"{name}\" name=\"{name}\">");
    for option in options {
        let attr = if *option == selected { " selected" } else { "" };
        let _ = write!(html, "<option value=\"{v}\"{attr}>{v}</option>", v = escape(option));
    }
    html.push_str("</select></div>");
    html
}

fn number(label: &str, range: NumericRange, value: f64) -> String {
    let step = if range.integer { "1" } else { "0.1" };
    let value = if range.integer { format!("{}", value as i64) } else { format!("{}", value) };
    format!(
        "<div><label for=\"{name}\">{label}</label>\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{value}\" required></div>",
        name = range.name,
        min = range.min,
        max = range.max,
    )
}

fn form(values: &StudentForm) -> String {
    let genders: Vec<&str> = Gender::ALL.iter().map(|g| g.as_str()).collect();
    let education: Vec<&str> = ParentEducation::ALL.iter().map(|e| e.as_str()).collect();
    let internet: Vec<&str> = InternetAccess::ALL.iter().map(|i| i.as_str()).collect();

    let fields = [
        select("gender", "Gender", &genders, &values.gender),
        number("Age", AGE, values.age as f64),
        number("Attendance (%)", ATTENDANCE, values.attendance_percentage),
        number("Hours Studied (per week)", HOURS_STUDIED, values.hours_studied),
        number("Previous Score", PREVIOUS_SCORE, values.previous_score),
        select("parent_education", "Parent Education", &education, &values.parent_education),
        select("internet_access", "Internet Access", &internet, &values.internet_access),
        number("Assignments Submitted", ASSIGNMENTS, values.assignments_submitted as f64),
        number("Internal Marks (out of 40)", INTERNAL_MARKS, values.internal_marks),
    ];

    format!(
        "<form method=\"post\" action=\"/predict\"><div class=\"grid\">{}</div>\
         <button type=\"submit\">Predict Performance</button></form>",
        fields.join("\n")
    )
}

fn echo_table(values: &StudentForm) -> String {
    let mut rows = String::new();
    for (label, value) in values.echo() {
        let _ = write!(rows, "<tr><td>{}</td><td>{}</td></tr>", label, escape(&value));
    }
    format!("<h3>Input Summary</h3><table>{}</table>", rows)
}

fn prediction_block(prediction: &Prediction, values: &StudentForm) -> String {
    let pass_pct = prediction.pass_probability * 100.0;
    let fail_pct = prediction.fail_probability * 100.0;
    let (class, verdict) = if prediction.is_pass() {
        ("pass", "The student is likely to PASS")
    } else {
        ("fail", "The student may FAIL; additional support is recommended")
    };

    format!(
        "<div class=\"result {class}\">\
         <h2>Prediction: {label}</h2><p>{verdict} (confidence {conf:.1}%).</p>\
         <div class=\"bar p\" style=\"width: {pass_w:.1}%\">Pass {pass_pct:.1}%</div>\
         <div class=\"bar f\" style=\"width: {fail_w:.1}%\">Fail {fail_pct:.1}%</div>\
         <p><small>Model: {model}</small></p>{echo}</div>",
        label = escape(&prediction.predicted_class),
        conf = prediction.confidence() * 100.0,
        pass_w = pass_pct.max(1.0),
        fail_w = fail_pct.max(1.0),
        model = escape(&prediction.model_name),
        echo = echo_table(values),
    )
}

/// Predictor page with an optional result or error
pub fn predictor_page(values: &StudentForm, outcome: Outcome<'_>, model_name: &str) -> String {
    let mut body = format!(
        "<h1>Student Performance Predictor</h1>\
         <p>Enter the student's details to predict whether they will pass or fail. \
         Current model: <strong>{}</strong>.</p>",
        escape(model_name)
    );
    body.push_str(&form(values));

    match outcome {
        Outcome::None => {}
        Outcome::Prediction(p) => body.push_str(&prediction_block(p, values)),
        Outcome::Error { message, guidance } => {
            let _ = write!(
                body,
                "<div class=\"result error\"><h2>Prediction failed</h2><p>{}</p><p>{}</p></div>",
                escape(&message),
                escape(guidance)
            );
        }
    }

    layout("Student Performance Predictor", &body)
}

/// Placeholder shown when no usable artifacts were found at startup
pub fn disabled_page(reason: Option<&str>) -> String {
    let mut body = String::from(
        "<h1>Student Performance Predictor</h1>\
         <div class=\"result disabled\"><h2>Model not available</h2>\
         <p>No trained model was found. Generate a dataset and train first:</p>\
         <pre>predictor generate\npredictor train</pre>\
         <p>Then restart the server.</p>",
    );
    if let Some(reason) = reason {
        let _ = write!(body, "<p><small>{}</small></p>", escape(reason));
    }
    body.push_str("</div>");
    layout("Student Performance Predictor - unavailable", &body)
}

pub fn about_page(model_name: Option<&str>) -> String {
    let current = model_name
        .map(|m| format!("<p>Currently loaded model: <strong>{}</strong>.</p>", escape(m)))
        .unwrap_or_else(|| "<p>No model is loaded.</p>".to_string());

    let body = format!(
        "<h1>About</h1>\
         <p>This application predicts whether a student will pass or fail from nine \
         demographic, behavioral and academic features.</p>{current}\
         <h2>Models</h2><ul>\
         <li><strong>Logistic Regression</strong>: L2-regularized linear classifier</li>\
         <li><strong>Random Forest</strong>: 100 bootstrapped decision trees</li>\
         <li><strong>Gradient Boosting</strong>: boosted trees on logistic loss</li></ul>\
         <p>The model with the best weighted F1 on a held-out 20% split is kept.</p>\
         <h2>Features</h2><ul>\
         <li>Gender, age</li><li>Attendance percentage</li><li>Weekly study hours</li>\
         <li>Previous exam score</li><li>Parent education level</li><li>Internet access</li>\
         <li>Assignments submitted (0 to 10)</li><li>Internal marks (out of 40)</li></ul>\
         <h2>Usage</h2><ol><li>Open the predictor page</li><li>Fill in the student's details</li>\
         <li>Submit to see the prediction and class probabilities</li></ol>"
    );
    layout("About - Student Performance Predictor", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"Bachelor's\"</b>"), "&lt;b&gt;&quot;Bachelor&#39;s&quot;&lt;/b&gt;");
    }

    #[test]
    fn test_form_preselects_values() {
        let values = StudentForm {
            parent_education: "Master's".to_string(),
            ..Default::default()
        };
        let html = predictor_page(&values, Outcome::None, "Random Forest");
        assert!(html.contains("<option value=\"Master&#39;s\" selected>"));
        assert!(html.contains("name=\"age\" min=\"18\" max=\"25\" step=\"1\" value=\"21\""));
    }

    #[test]
    fn test_prediction_block_shows_both_probabilities() {
        let prediction = Prediction {
            predicted_class: "Pass".to_string(),
            pass_probability: 0.8,
            fail_probability: 0.2,
            model_name: "Logistic Regression".to_string(),
        };
        let html = predictor_page(&StudentForm::default(), Outcome::Prediction(&prediction), "x");
        assert!(html.contains("Prediction: Pass"));
        assert!(html.contains("Pass 80.0%"));
        assert!(html.contains("Fail 20.0%"));
        assert!(html.contains("Input Summary"));
    }

    #[test]
    fn test_error_message_is_escaped() {
        let html = predictor_page(
            &StudentForm::default(),
            Outcome::Error { message: "<script>".to_string(), guidance: "fix it" },
            "x",
        );
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
