//! Form handlers
//!
//! `GET /` renders the empty form; `POST /predict` scores the submission and
//! renders the same form again with the result or the error underneath.

use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    Form,
};

use crate::features::RawInput;
use crate::pipeline::predict_churn;
use crate::presenter::PresentedResult;
use crate::ui::{render_page, FormView};
use crate::AppState;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let input = RawInput::initial(&state.artifacts);
    Html(render_page(&state.artifacts, &input, &FormView::Collecting))
}

pub async fn submit(
    State(state): State<AppState>,
    form: Result<Form<RawInput>, FormRejection>,
) -> Html<String> {
    let input = match form {
        Ok(Form(input)) => input,
        Err(rejection) => {
            tracing::debug!("Form rejected: {}", rejection);
            // Nothing deserialized, so there are no submitted values to keep
            let input = RawInput::initial(&state.artifacts);
            let view = FormView::Failed(rejection.body_text());
            return Html(render_page(&state.artifacts, &input, &view));
        }
    };

    let view = match predict_churn(&input, &state.artifacts) {
        Ok(result) => FormView::ShowingResult(PresentedResult::from(&result)),
        Err(e) => {
            tracing::warn!("Prediction failed: {}", e);
            FormView::Failed(e.to_string())
        }
    };

    Html(render_page(&state.artifacts, &input, &view))
}
