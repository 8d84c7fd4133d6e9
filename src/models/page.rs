use serde::{Deserialize, Deserializer, Serialize};

/// One page of a collection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn single(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Self {
            items,
            page: 1,
            total_pages: 1,
            total,
        }
    }

    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::single(Vec::new())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagedBody<T> {
    #[serde(alias = "items", alias = "results")]
    data: Vec<T>,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default, alias = "pages")]
    total_pages: Option<u32>,
    #[serde(default, alias = "count")]
    total: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListingBody<T> {
    Bare(Vec<T>),
    Paged(PagedBody<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ListingBody::<T>::deserialize(deserializer)? {
            ListingBody::Bare(items) => Page::single(items),
            ListingBody::Paged(body) => {
                let total = body.total.unwrap_or(body.data.len() as u64);
                Page {
                    page: body.page.unwrap_or(1).max(1),
                    total_pages: body.total_pages.unwrap_or(1).max(1),
                    total,
                    items: body.data,
                }
            }
        })
    }
}
