use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

/// Public contact details of the business.
#[derive(Debug, Serialize)]
pub struct ContactInfo {
    pub business_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp_url: Option<String>,
}

/// GET /api/v1/site/contact-info
pub async fn contact_info(State(state): State<AppState>) -> Json<DataResponse<ContactInfo>> {
    let site = &state.config.site;
    Json(DataResponse {
        data: ContactInfo {
            business_name: site.business_name.clone(),
            email: site.public_email.clone(),
            phone: site.public_whatsapp_number.clone(),
            whatsapp_url: site.whatsapp_url(),
        },
    })
}
