use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(BaselineId);

/// Product (configuration item) identifier as typed by users, e.g. `"ENGINE-42"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    /// Trims user input; blank input means "no product".
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaselineKind {
    #[default]
    Latest,
    Released,
}

impl BaselineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BaselineKind::Latest => "LATEST",
            BaselineKind::Released => "RELEASED",
        }
    }
}

/// Scope of a baseline listing. `None` lists baselines of every product.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductFilter(Option<ProductId>);

impl ProductFilter {
    pub fn all() -> Self {
        Self(None)
    }

    pub fn product(product_id: ProductId) -> Self {
        Self(Some(product_id))
    }

    pub fn from_input(raw: &str) -> Self {
        Self(ProductId::parse(raw))
    }

    pub fn product_id(&self) -> Option<&ProductId> {
        self.0.as_ref()
    }

    pub fn covers(&self, product_id: &ProductId) -> bool {
        match &self.0 {
            Some(scoped) => scoped == product_id,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_unscoped() {
        assert_eq!(ProductFilter::from_input("   "), ProductFilter::all());
        assert_eq!(ProductFilter::from_input("").product_id(), None);
    }

    #[test]
    fn scoped_filter_covers_only_its_product() {
        let filter = ProductFilter::from_input(" ENGINE ");
        assert_eq!(
            filter.product_id().map(ProductId::as_str),
            Some("ENGINE")
        );
        assert!(filter.covers(&ProductId("ENGINE".into())));
        assert!(!filter.covers(&ProductId("WING".into())));
        assert!(ProductFilter::all().covers(&ProductId("WING".into())));
    }
}
