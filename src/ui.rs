//! Form page rendering
//!
//! Server-side HTML for the single-page form. Selects are built from the
//! loaded encoder vocabularies, so the browser can only submit known labels.
//!
//! Page state per request:
//!
//! ```text
//! GET /            -> Collecting
//! POST /predict    -> ShowingResult | Failed (form stays filled in)
//! ```

use std::fmt::Write;

use crate::artifacts::ArtifactStore;
use crate::constants::APP_NAME;
use crate::features::input::{
    RawInput, YesNo, AGE_RANGE, CREDIT_SCORE_RANGE, NUM_OF_PRODUCTS_RANGE, TENURE_RANGE,
};
use crate::presenter::PresentedResult;

#[derive(Debug, Clone)]
pub enum FormView {
    Collecting,
    ShowingResult(PresentedResult),
    Failed(String),
}

const STYLE: &str = "\
body{font-family:sans-serif;max-width:760px;margin:2rem auto;padding:0 1rem}\
h1,.lead{text-align:center}\
.columns{display:flex;gap:2rem}.columns>div{flex:1}\
label{display:block;margin-top:.8rem}\
select,input{width:100%;box-sizing:border-box}\
button{width:100%;margin-top:1.5rem;padding:.6rem}\
.metric{font-size:2rem;font-weight:bold}\
.banner{padding:.8rem;border-radius:4px;margin-top:1rem}\
.error{background:#fde2e2;color:#8a1c1c}.success{background:#e2f6e6;color:#1c6b2e}";

pub fn render_page(artifacts: &ArtifactStore, input: &RawInput, view: &FormView) -> String {
    let mut html = String::with_capacity(4096);

    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title>\
         <style>{style}</style></head><body>\
         <h1>{title}</h1>\
         <p class=\"lead\">Predict whether a customer is likely to leave the bank</p><hr>\
         <h2>Customer Information</h2>\
         <form method=\"post\" action=\"/predict\"><div class=\"columns\"><div>",
        title = APP_NAME,
        style = STYLE,
    );

    select(&mut html, "Geography", "Geography", artifacts.geography_categories(), &input.geography);
    select(&mut html, "Gender", "Gender", artifacts.gender_classes(), &input.gender);
    slider(&mut html, "Age", "Age", AGE_RANGE.start(), AGE_RANGE.end(), input.age);
    slider(&mut html, "Tenure", "Tenure (Years)", TENURE_RANGE.start(), TENURE_RANGE.end(), input.tenure);
    slider(
        &mut html,
        "NumOfProducts",
        "Number of Products",
        NUM_OF_PRODUCTS_RANGE.start(),
        NUM_OF_PRODUCTS_RANGE.end(),
        input.num_of_products,
    );

    html.push_str("</div><div>");

    let _ = write!(
        html,
        "<label for=\"CreditScore\">Credit Score</label>\
         <input type=\"number\" id=\"CreditScore\" name=\"CreditScore\" min=\"{}\" max=\"{}\" step=\"1\" value=\"{}\" required>",
        CREDIT_SCORE_RANGE.start(),
        CREDIT_SCORE_RANGE.end(),
        input.credit_score,
    );
    number(&mut html, "Balance", "Account Balance", input.balance);
    number(&mut html, "EstimatedSalary", "Estimated Salary", input.estimated_salary);
    yes_no(&mut html, "HasCrCard", "Has Credit Card", input.has_cr_card);
    yes_no(&mut html, "IsActiveMember", "Active Member", input.is_active_member);

    html.push_str("</div></div><button type=\"submit\">Predict Churn</button></form>");

    match view {
        FormView::Collecting => {}
        FormView::ShowingResult(result) => {
            let _ = write!(
                html,
                "<hr><h2>Prediction Result</h2>\
                 <div>Churn Probability</div><div class=\"metric\">{}</div>\
                 <div class=\"banner {}\">{}</div>",
                result.percentage,
                result.verdict.banner_class(),
                escape(&result.message),
            );
        }
        FormView::Failed(message) => {
            let _ = write!(
                html,
                "<hr><div class=\"banner error\">{}</div>",
                escape(message)
            );
        }
    }

    html.push_str("</body></html>");
    html
}

fn select(html: &mut String, name: &str, label: &str, options: &[String], selected: &str) {
    let _ = write!(html, "<label for=\"{name}\">{label}</label><select id=\"{name}\" name=\"{name}\">");
    for option in options {
        let option = escape(option);
        let marker = if option == escape(selected) { " selected" } else { "" };
        let _ = write!(html, "<option value=\"{option}\"{marker}>{option}</option>");
    }
    html.push_str("</select>");
}

fn slider(html: &mut String, name: &str, label: &str, min: &i32, max: &i32, value: i32) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}: <output id=\"{name}Out\">{value}</output></label>\
         <input type=\"range\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" value=\"{value}\" \
         oninput=\"{name}Out.value=this.value\">"
    );
}

fn number(html: &mut String, name: &str, label: &str, value: f64) {
    let _ = write!(
        html,
        "<label for=\"{name}\">{label}</label>\
         <input type=\"number\" id=\"{name}\" name=\"{name}\" step=\"0.01\" value=\"{value:.2}\" required>"
    );
}

fn yes_no(html: &mut String, name: &str, label: &str, selected: YesNo) {
    let _ = write!(html, "<label for=\"{name}\">{label}</label><select id=\"{name}\" name=\"{name}\">");
    for choice in YesNo::CHOICES {
        let marker = if choice == selected { " selected" } else { "" };
        let _ = write!(html, "<option value=\"{0}\"{marker}>{0}</option>", choice.label());
    }
    html.push_str("</select>");
}

/// Minimal HTML escaping for text and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
