pub type TagName = &'static str;

/// Invalidation scope attached to a memoized value.
///
/// `Global` tags are shared across every user, `User` tags cover everything
/// a single user owns, `Entity` tags pin a single row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Global { name: TagName },
    User { user_id: String, name: TagName },
    Entity { entity_id: i64, name: TagName },
}

impl Tag {
    pub fn global(name: TagName) -> Self {
        Self::Global { name }
    }

    pub fn user(user_id: impl Into<String>, name: TagName) -> Self {
        Self::User {
            user_id: user_id.into(),
            name,
        }
    }

    pub fn entity(entity_id: i64, name: TagName) -> Self {
        Self::Entity { entity_id, name }
    }

    pub fn name(&self) -> TagName {
        match self {
            Self::Global { name } | Self::User { name, .. } | Self::Entity { name, .. } => name,
        }
    }
}

/// A write's eviction request: a tag name plus optional scope qualifiers,
/// applied to every tag it [`matches`](Self::matches).
#[derive(Debug, Clone)]
pub struct Invalidation {
    name: TagName,
    user_id: Option<String>,
    entity_id: Option<i64>,
}

impl Invalidation {
    pub fn of(name: TagName) -> Self {
        Self {
            name,
            user_id: None,
            entity_id: None,
        }
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn for_entity(mut self, entity_id: i64) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    pub fn name(&self) -> TagName {
        self.name
    }

    /// Global tags match on name alone; user and entity tags additionally
    /// require the same qualifier on the request.
    pub fn matches(&self, tag: &Tag) -> bool {
        match tag {
            Tag::Global { name } => *name == self.name,
            Tag::User { user_id, name } => {
                *name == self.name && self.user_id.as_deref() == Some(user_id)
            }
            Tag::Entity { entity_id, name } => {
                *name == self.name && self.entity_id == Some(*entity_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_tag_matches_any_qualifier() {
        let tag = Tag::global("products");

        assert!(Invalidation::of("products").matches(&tag));
        assert!(Invalidation::of("products").for_user("u1").matches(&tag));
        assert!(Invalidation::of("products").for_entity(7).matches(&tag));
        assert!(!Invalidation::of("countries").matches(&tag));
    }

    #[test]
    fn user_tag_requires_same_user() {
        let tag = Tag::user("u1", "products");

        assert!(Invalidation::of("products").for_user("u1").matches(&tag));
        assert!(!Invalidation::of("products").for_user("u2").matches(&tag));
        assert!(!Invalidation::of("products").matches(&tag));
        assert!(!Invalidation::of("products").for_entity(1).matches(&tag));
    }

    #[test]
    fn entity_tag_requires_same_entity() {
        let tag = Tag::entity(42, "products");

        assert!(Invalidation::of("products").for_entity(42).matches(&tag));
        assert!(!Invalidation::of("products").for_entity(43).matches(&tag));
        assert!(!Invalidation::of("products").matches(&tag));
        assert!(!Invalidation::of("products").for_user("42").matches(&tag));
    }

    #[test]
    fn qualifiers_are_independent() {
        let request = Invalidation::of("products").for_user("u1").for_entity(42);

        assert!(request.matches(&Tag::global("products")));
        assert!(request.matches(&Tag::user("u1", "products")));
        assert!(request.matches(&Tag::entity(42, "products")));
        assert!(!request.matches(&Tag::user("u2", "products")));
        assert!(!request.matches(&Tag::entity(43, "products")));
    }
}
