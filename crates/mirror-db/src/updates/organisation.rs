//! Organisation insert payload and update builder.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrganisation {
    pub external_id: String,
    pub name: String,
    pub slug: Option<String>,
}

impl NewOrganisation {
    #[must_use]
    pub fn new(external_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            name: name.into(),
            slug: None,
        }
    }

    #[must_use]
    pub fn with_slug(mut self, slug: Option<impl Into<String>>) -> Self {
        self.slug = slug.map(Into::into);
        self
    }
}

/// Partial organisation patch. `slug: Some(None)` clears the stored slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganisationUpdate {
    pub name: Option<String>,
    pub slug: Option<Option<String>>,
}

pub struct OrganisationUpdateBuilder(OrganisationUpdate);

impl OrganisationUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(OrganisationUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn slug(mut self, slug: Option<String>) -> Self {
        self.0.slug = Some(slug);
        self
    }

    #[must_use]
    pub fn build(self) -> OrganisationUpdate {
        self.0
    }
}

impl Default for OrganisationUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
