use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::store::Contact;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub email_address: Option<String>,
}

/// The single field a search targets. Constructed only after the
/// exactly-one-parameter rule has been checked, so lookup code never
/// branches on optional parameters.
#[derive(Debug, PartialEq, Eq)]
pub enum SearchTerm {
    ByName(String),
    ByEmail(String),
}

impl SearchTerm {
    pub fn from_query(query: SearchQuery) -> Result<Self, ApiError> {
        match (query.name, query.email_address) {
            (Some(_), Some(_)) => Err(ApiError::bad_request(
                "Can't search by both email and name",
            )),
            (None, None) => Err(ApiError::bad_request(
                "Pass either email_address or name to find contact",
            )),
            (Some(name), None) => Ok(SearchTerm::ByName(name)),
            (None, Some(email)) => Ok(SearchTerm::ByEmail(email)),
        }
    }
}

/// GET /search/?name=X or /search/?email_address=X - exact-match lookup
pub async fn get(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Contact>, ApiError> {
    let contact = match SearchTerm::from_query(query)? {
        SearchTerm::ByName(name) => state.contacts.get_by_name(&name).await?,
        SearchTerm::ByEmail(email) => state.contacts.get_by_email(&email).await?,
    };

    Ok(Json(contact))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(name: Option<&str>, email: Option<&str>) -> SearchQuery {
        SearchQuery {
            name: name.map(String::from),
            email_address: email.map(String::from),
        }
    }

    #[test]
    fn exactly_one_field_builds_a_term() {
        assert_eq!(
            SearchTerm::from_query(query(Some("Ada"), None)).unwrap(),
            SearchTerm::ByName("Ada".to_string())
        );
        assert_eq!(
            SearchTerm::from_query(query(None, Some("ada@example.com"))).unwrap(),
            SearchTerm::ByEmail("ada@example.com".to_string())
        );
    }

    #[test]
    fn both_fields_rejected() {
        let err = SearchTerm::from_query(query(Some("Ada"), Some("ada@example.com"))).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn neither_field_rejected() {
        let err = SearchTerm::from_query(query(None, None)).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
