//! Field-name enums for each item category.
//!
//! Every category has its own enum space. A field name carries the match
//! kinds it accepts; the compiler rejects an item whose item type is not in
//! that set before any fragment is built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Category, ItemType};

/// Match kinds accepted by free-text fields.
pub const TEXT_ITEM_TYPES: &[ItemType] = &[
    ItemType::ExactMatch,
    ItemType::Partial,
    ItemType::StartsWith,
    ItemType::DoesntContain,
];

/// Match kinds accepted by numeric and date fields.
pub const NUMERIC_ITEM_TYPES: &[ItemType] = &[ItemType::ExactMatch, ItemType::Range];

/// Match kinds accepted by identifier and enum-valued fields.
pub const ID_ITEM_TYPES: &[ItemType] = &[ItemType::ExactMatch, ItemType::DoesntContain];

/// Only exact matching.
pub const EXACT_ITEM_TYPES: &[ItemType] = &[ItemType::ExactMatch];

/// A category-specific field-name enum.
pub trait FieldName: Copy + FromStr + fmt::Display + 'static {
    /// The category whose field map this enum indexes.
    const CATEGORY: Category;

    /// Every field of the enum.
    fn all() -> &'static [Self];

    /// The registry key of the field.
    fn key(&self) -> &'static str;

    /// Match kinds this field accepts.
    fn allowed_item_types(&self) -> &'static [ItemType];

    /// Fields that accept the given match kind.
    fn allowed_fields_for_type(item_type: ItemType) -> Vec<Self> {
        Self::all()
            .iter()
            .copied()
            .filter(|field| field.allowed_item_types().contains(&item_type))
            .collect()
    }
}

macro_rules! field_names {
    (
        $(#[$meta:meta])*
        $name:ident ($category:expr) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $key:literal : $types:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl FieldName for $name {
            const CATEGORY: Category = $category;

            fn all() -> &'static [Self] {
                &[$($name::$variant),+]
            }

            fn key(&self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            fn allowed_item_types(&self) -> &'static [ItemType] {
                match self {
                    $($name::$variant => $types,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.key())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($key => Ok($name::$variant),)+
                    _ => Err(format!("unknown {} field: {}", $category, s)),
                }
            }
        }
    };
}

field_names! {
    /// Fields of the entry document.
    EntryFieldName (Category::Entry) {
        /// Entry id.
        Id => "id": ID_ITEM_TYPES,
        /// Display name.
        Name => "name": TEXT_ITEM_TYPES,
        /// Free-text description.
        Description => "description": TEXT_ITEM_TYPES,
        /// Comma-separated tags.
        Tags => "tags": TEXT_ITEM_TYPES,
        /// Owner of the entry.
        UserId => "user_id": ID_ITEM_TYPES,
        /// User who created the entry.
        CreatorId => "creator_id": ID_ITEM_TYPES,
        /// Caller-assigned external reference.
        ReferenceId => "reference_id": TEXT_ITEM_TYPES,
        /// Kind of entry.
        EntryType => "entry_type": ID_ITEM_TYPES,
        /// Media kind of the content.
        MediaType => "media_type": ID_ITEM_TYPES,
        /// How the content was ingested.
        SourceType => "source_type": ID_ITEM_TYPES,
        /// Processing status.
        Status => "status": ID_ITEM_TYPES,
        /// Creation time, in epoch seconds.
        CreatedAt => "created_at": NUMERIC_ITEM_TYPES,
        /// Last update time, in epoch seconds.
        UpdatedAt => "updated_at": NUMERIC_ITEM_TYPES,
        /// Start of the scheduling window.
        StartDate => "start_date": NUMERIC_ITEM_TYPES,
        /// End of the scheduling window.
        EndDate => "end_date": NUMERIC_ITEM_TYPES,
        /// Playback length.
        Duration => "duration": NUMERIC_ITEM_TYPES,
        /// View count.
        Views => "views": NUMERIC_ITEM_TYPES,
        /// Vote count.
        Votes => "votes": NUMERIC_ITEM_TYPES,
    }
}

field_names! {
    /// Fields of the user document.
    UserFieldName (Category::User) {
        /// Screen name.
        ScreenName => "screen_name": TEXT_ITEM_TYPES,
        /// Email address.
        Email => "email": TEXT_ITEM_TYPES,
        /// Account kind.
        Type => "type": ID_ITEM_TYPES,
        /// Comma-separated tags.
        Tags => "tags": TEXT_ITEM_TYPES,
        /// Last update time, in epoch seconds.
        UpdatedAt => "updated_at": NUMERIC_ITEM_TYPES,
        /// Creation time, in epoch seconds.
        CreatedAt => "created_at": NUMERIC_ITEM_TYPES,
        /// Family name.
        LastName => "last_name": TEXT_ITEM_TYPES,
        /// Given name.
        FirstName => "first_name": TEXT_ITEM_TYPES,
        /// Names of granted permissions.
        PermissionNames => "permission_names": TEXT_ITEM_TYPES,
        /// Groups the user belongs to.
        GroupIds => "group_ids": ID_ITEM_TYPES,
        /// Roles assigned to the user.
        RoleIds => "role_ids": ID_ITEM_TYPES,
    }
}

field_names! {
    /// Fields of a caption line.
    CaptionFieldName (Category::Caption) {
        /// Caption text.
        Content => "content": TEXT_ITEM_TYPES,
        /// Line start offset, in milliseconds.
        StartTime => "start_time": NUMERIC_ITEM_TYPES,
        /// Line end offset, in milliseconds.
        EndTime => "end_time": NUMERIC_ITEM_TYPES,
    }
}

field_names! {
    /// Value fields of a metadata entry.
    MetadataFieldName (Category::Metadata) {
        /// Text value.
        ValueText => "value_text": TEXT_ITEM_TYPES,
        /// Numeric value.
        ValueInt => "value_int": NUMERIC_ITEM_TYPES,
    }
}

field_names! {
    /// Category membership fields.
    CategoryEntryFieldName (Category::CategoryEntry) {
        /// Direct membership in a category.
        Id => "id": ID_ITEM_TYPES,
        /// Membership in a category or any of its descendants.
        AncestorId => "ancestor_id": EXACT_ITEM_TYPES,
    }
}

impl Default for CaptionFieldName {
    fn default() -> Self {
        CaptionFieldName::Content
    }
}

impl Default for MetadataFieldName {
    fn default() -> Self {
        MetadataFieldName::ValueText
    }
}

/// A reference to a field: either a known enum value or a caller-defined key.
///
/// Dynamic keys are resolved through the registry's dynamic map and name
/// fields that cannot be enumerated ahead of time, such as custom metadata
/// value paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldRef<F> {
    /// A statically declared field.
    Known(F),
    /// A runtime-defined field key.
    Dynamic(String),
}

impl<F: FieldName> FieldRef<F> {
    /// Creates a dynamic field reference.
    pub fn dynamic(key: impl Into<String>) -> Self {
        FieldRef::Dynamic(key.into())
    }

    /// The registry key of the field.
    pub fn key(&self) -> &str {
        match self {
            FieldRef::Known(field) => field.key(),
            FieldRef::Dynamic(key) => key,
        }
    }

    /// Returns the known field, parsing dynamic keys that name one.
    pub fn known(&self) -> Option<F> {
        match self {
            FieldRef::Known(field) => Some(*field),
            FieldRef::Dynamic(key) => key.parse().ok(),
        }
    }
}

impl<F> From<F> for FieldRef<F> {
    fn from(field: F) -> Self {
        FieldRef::Known(field)
    }
}

impl<F: FieldName> fmt::Display for FieldRef<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
