//! Query string construction for the character collection endpoint

use crate::models::FilterSet;

/// Build the query suffix for a collection request.
///
/// Fields always appear in the order name, status, gender, species, page.
/// Blank or missing values are left out and every value is percent-encoded.
/// Returns an empty string when nothing is set.
pub fn build_query(name: Option<&str>, filters: Option<&FilterSet>, page: Option<u32>) -> String {
    let mut params: Vec<(&str, String)> = Vec::with_capacity(5);

    if let Some(name) = non_blank(name) {
        params.push(("name", name.to_string()));
    }

    if let Some(filters) = filters {
        let categorical = [
            ("status", filters.status.as_deref()),
            ("gender", filters.gender.as_deref()),
            ("species", filters.species.as_deref()),
        ];
        for (key, value) in categorical {
            if let Some(value) = non_blank(value) {
                params.push((key, value.to_lowercase()));
            }
        }
    }

    if let Some(page) = page {
        params.push(("page", page.to_string()));
    }

    if params.is_empty() {
        return String::new();
    }

    let joined = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("?{}", joined)
}

/// Full collection URL for a base endpoint and a query suffix
pub fn collection_url(base: &str, query: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), query)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
