use axum::extract::Json;

use crate::view::{category_options, DropdownOption};

pub async fn list() -> Json<Vec<DropdownOption>> {
    category_options().into()
}
