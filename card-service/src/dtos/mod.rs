use rust_decimal::Decimal;
use serde::Deserialize;

/// Body of `POST /cards` and `PUT /cards/{id}`. Any `id` or `owner` the client
/// sends is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CardRequest {
    pub amount: Decimal,
}

/// Raw listing parameters. Kept as strings so bad values fall back to
/// defaults instead of rejecting the request.
///
/// Built from the raw key/value pairs so repeated keys never reject the
/// request: the first `page` and `size` win, and more than one `sort` counts
/// as unparsable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams {
    pub page: Option<String>,
    pub size: Option<String>,
    pub sort: Option<String>,
}

impl PageParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        let mut sorts = 0usize;

        for (key, value) in pairs {
            match key.as_str() {
                "page" => {
                    params.page.get_or_insert(value);
                }
                "size" => {
                    params.size.get_or_insert(value);
                }
                "sort" => {
                    sorts += 1;
                    params.sort = Some(value);
                }
                _ => {}
            }
        }

        if sorts > 1 {
            params.sort = None;
        }

        params
    }
}
