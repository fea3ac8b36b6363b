/// A top-level catalog entry whose devices are enumerated
///
/// The name is the brand's unique key across the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Brand {
    pub name: String,
    pub listing_url: String,
}

impl Brand {
    pub fn new(name: impl Into<String>, listing_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            listing_url: listing_url.into(),
        }
    }
}

/// A pointer to one device detail page, produced by pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReference {
    pub model: String,
    pub detail_url: String,
    pub brand: Brand,
}

impl DeviceReference {
    pub fn new(model: impl Into<String>, detail_url: impl Into<String>, brand: &Brand) -> Self {
        Self {
            model: model.into(),
            detail_url: detail_url.into(),
            brand: brand.clone(),
        }
    }
}
