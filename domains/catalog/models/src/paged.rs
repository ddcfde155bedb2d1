use serde::{Deserialize, Deserializer, Serialize};

/// One page of a listing plus the number of rows matching it in total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PagedResult<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: i64,
}

impl<T> PagedResult<T> {
    pub fn new(data: Option<Vec<T>>, total: Option<i64>) -> Self {
        Self {
            data: data.unwrap_or_default(),
            total: total.unwrap_or_default(),
        }
    }

    pub fn empty() -> Self { Self::new(None, None) }
}

impl<T> Default for PagedResult<T> {
    fn default() -> Self { Self::empty() }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parts_become_empty() {
        let page = PagedResult::<i64>::new(None, None);
        assert_eq!(page.data, Vec::<i64>::new());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let page: PagedResult<i64> =
            serde_json::from_str(r#"{"data":null,"total":null}"#).unwrap();
        assert_eq!(page, PagedResult::empty());

        let page: PagedResult<i64> = serde_json::from_str("{}").unwrap();
        assert_eq!(page, PagedResult::empty());
    }

    #[test]
    fn test_empty_page_serializes_explicitly() {
        let json = serde_json::to_string(&PagedResult::<i64>::empty()).unwrap();
        assert_eq!(json, r#"{"data":[],"total":0}"#);
    }
}
