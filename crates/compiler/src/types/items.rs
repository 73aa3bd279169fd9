//! Search items: the leaf predicates of a criteria tree.
//!
//! [`SearchItem`] is a tagged union over the item categories. Each variant
//! validates itself against the field mapping registry; fragment
//! construction lives in [`crate::query::builders`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};
use crate::mapping::FieldMappingRegistry;

use super::fields::{
    CaptionFieldName, CategoryEntryFieldName, EntryFieldName, FieldName, FieldRef,
    MetadataFieldName, UserFieldName,
};
use super::{Category, ItemType, RangeBounds, SearchTerm};

/// A single leaf predicate against one field of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchItem {
    /// Entry document field.
    Entry(EntryItem),
    /// Caption line content or timing.
    Caption(CaptionItem),
    /// Custom metadata value.
    Metadata(MetadataItem),
    /// User document field.
    User(UserItem),
    /// Category membership.
    CategoryEntry(CategoryEntryItem),
}

impl SearchItem {
    /// Returns the category of the item.
    pub fn category(&self) -> Category {
        match self {
            SearchItem::Entry(_) => Category::Entry,
            SearchItem::Caption(_) => Category::Caption,
            SearchItem::Metadata(_) => Category::Metadata,
            SearchItem::User(_) => Category::User,
            SearchItem::CategoryEntry(_) => Category::CategoryEntry,
        }
    }

    /// Returns the match kind requested by the item.
    pub fn item_type(&self) -> ItemType {
        match self {
            SearchItem::Entry(item) => item.item_type,
            SearchItem::Caption(item) => item.item_type,
            SearchItem::Metadata(item) => item.item_type,
            SearchItem::User(item) => item.item_type,
            SearchItem::CategoryEntry(item) => item.item_type,
        }
    }

    /// Returns the registry key of the item's field.
    pub fn field_key(&self) -> &str {
        match self {
            SearchItem::Entry(item) => item.field_name.key(),
            SearchItem::Caption(item) => item.field_name.key(),
            SearchItem::Metadata(item) => item.field_name.key(),
            SearchItem::User(item) => item.field_name.key(),
            SearchItem::CategoryEntry(item) => item.field_name.key(),
        }
    }

    /// Keys of the statically declared fields that accept `item_type` for
    /// this item's category.
    pub fn allowed_fields_for_type(&self, item_type: ItemType) -> Vec<&'static str> {
        fn keys<F: FieldName>(item_type: ItemType) -> Vec<&'static str> {
            F::allowed_fields_for_type(item_type)
                .iter()
                .map(|field| field.key())
                .collect()
        }

        match self {
            SearchItem::Entry(_) => keys::<EntryFieldName>(item_type),
            SearchItem::Caption(_) => keys::<CaptionFieldName>(item_type),
            SearchItem::Metadata(_) => keys::<MetadataFieldName>(item_type),
            SearchItem::User(_) => keys::<UserFieldName>(item_type),
            SearchItem::CategoryEntry(_) => keys::<CategoryEntryFieldName>(item_type),
        }
    }

    /// Checks the item against the registry.
    pub fn validate(&self, registry: &FieldMappingRegistry) -> CompileResult<()> {
        match self {
            SearchItem::Entry(item) => item.validate(registry),
            SearchItem::Caption(item) => item.validate(registry),
            SearchItem::Metadata(item) => item.validate(registry),
            SearchItem::User(item) => item.validate(registry),
            SearchItem::CategoryEntry(item) => item.validate(registry),
        }
    }
}

impl From<EntryItem> for SearchItem {
    fn from(item: EntryItem) -> Self {
        SearchItem::Entry(item)
    }
}

impl From<CaptionItem> for SearchItem {
    fn from(item: CaptionItem) -> Self {
        SearchItem::Caption(item)
    }
}

impl From<MetadataItem> for SearchItem {
    fn from(item: MetadataItem) -> Self {
        SearchItem::Metadata(item)
    }
}

impl From<UserItem> for SearchItem {
    fn from(item: UserItem) -> Self {
        SearchItem::User(item)
    }
}

impl From<CategoryEntryItem> for SearchItem {
    fn from(item: CategoryEntryItem) -> Self {
        SearchItem::CategoryEntry(item)
    }
}

/// A predicate on an entry document field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryItem {
    /// Match kind.
    pub item_type: ItemType,
    /// Field to match.
    pub field_name: FieldRef<EntryFieldName>,
    /// Value to match (all item types except range).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<SearchTerm>,
    /// Bounds (range items only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeBounds>,
}

impl EntryItem {
    /// Creates a term-based entry item.
    pub fn new(
        item_type: ItemType,
        field_name: impl Into<FieldRef<EntryFieldName>>,
        search_term: impl Into<SearchTerm>,
    ) -> Self {
        Self {
            item_type,
            field_name: field_name.into(),
            search_term: Some(search_term.into()),
            range: None,
        }
    }

    /// Creates a range entry item.
    pub fn range(field_name: impl Into<FieldRef<EntryFieldName>>, range: RangeBounds) -> Self {
        Self {
            item_type: ItemType::Range,
            field_name: field_name.into(),
            search_term: None,
            range: Some(range),
        }
    }

    /// Entry fields that accept the given match kind.
    pub fn allowed_fields_for_type(item_type: ItemType) -> Vec<EntryFieldName> {
        EntryFieldName::allowed_fields_for_type(item_type)
    }

    fn validate(&self, registry: &FieldMappingRegistry) -> CompileResult<()> {
        check_field_ref(&self.field_name, self.item_type, registry)?;
        check_term(
            Category::Entry,
            self.field_name.key(),
            self.item_type,
            self.search_term.as_ref(),
            self.range.as_ref(),
        )
    }
}

/// A predicate on a user document field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserItem {
    /// Match kind.
    pub item_type: ItemType,
    /// Field to match.
    pub field_name: FieldRef<UserFieldName>,
    /// Value to match (all item types except range).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<SearchTerm>,
    /// Bounds (range items only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeBounds>,
}

impl UserItem {
    /// Creates a term-based user item.
    pub fn new(
        item_type: ItemType,
        field_name: impl Into<FieldRef<UserFieldName>>,
        search_term: impl Into<SearchTerm>,
    ) -> Self {
        Self {
            item_type,
            field_name: field_name.into(),
            search_term: Some(search_term.into()),
            range: None,
        }
    }

    /// Creates a range user item.
    pub fn range(field_name: impl Into<FieldRef<UserFieldName>>, range: RangeBounds) -> Self {
        Self {
            item_type: ItemType::Range,
            field_name: field_name.into(),
            search_term: None,
            range: Some(range),
        }
    }

    /// User fields that accept the given match kind.
    pub fn allowed_fields_for_type(item_type: ItemType) -> Vec<UserFieldName> {
        UserFieldName::allowed_fields_for_type(item_type)
    }

    fn validate(&self, registry: &FieldMappingRegistry) -> CompileResult<()> {
        check_field_ref(&self.field_name, self.item_type, registry)?;
        check_term(
            Category::User,
            self.field_name.key(),
            self.item_type,
            self.search_term.as_ref(),
            self.range.as_ref(),
        )
    }
}

/// A predicate on caption lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionItem {
    /// Match kind.
    pub item_type: ItemType,
    /// Line field to match.
    #[serde(default)]
    pub field_name: CaptionFieldName,
    /// Value to match (all item types except range).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<SearchTerm>,
    /// Bounds (range items only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeBounds>,
    /// Only lines starting at or after this offset (milliseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_in_video: Option<i64>,
    /// Only lines ending at or after this offset (milliseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_in_video: Option<i64>,
}

impl CaptionItem {
    /// Creates a caption content item.
    pub fn new(item_type: ItemType, search_term: impl Into<SearchTerm>) -> Self {
        Self {
            item_type,
            field_name: CaptionFieldName::Content,
            search_term: Some(search_term.into()),
            range: None,
            start_time_in_video: None,
            end_time_in_video: None,
        }
    }

    /// Creates a range item on a caption timing field.
    pub fn range(field_name: CaptionFieldName, range: RangeBounds) -> Self {
        Self {
            item_type: ItemType::Range,
            field_name,
            search_term: None,
            range: Some(range),
            start_time_in_video: None,
            end_time_in_video: None,
        }
    }

    /// Restricts matches to a window of the video.
    pub fn with_time_window(mut self, start: Option<i64>, end: Option<i64>) -> Self {
        self.start_time_in_video = start;
        self.end_time_in_video = end;
        self
    }

    /// Caption fields that accept the given match kind.
    pub fn allowed_fields_for_type(item_type: ItemType) -> Vec<CaptionFieldName> {
        CaptionFieldName::allowed_fields_for_type(item_type)
    }

    fn validate(&self, registry: &FieldMappingRegistry) -> CompileResult<()> {
        check_known_field(self.field_name, self.item_type, registry)?;
        check_term(
            Category::Caption,
            self.field_name.key(),
            self.item_type,
            self.search_term.as_ref(),
            self.range.as_ref(),
        )?;
        if self.start_time_in_video.is_some() {
            registry.resolve(Category::Caption, CaptionFieldName::StartTime.key())?;
        }
        if self.end_time_in_video.is_some() {
            registry.resolve(Category::Caption, CaptionFieldName::EndTime.key())?;
        }
        Ok(())
    }
}

/// A predicate on custom metadata values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataItem {
    /// Match kind.
    pub item_type: ItemType,
    /// Value field to match.
    #[serde(default = "default_metadata_field")]
    pub field_name: FieldRef<MetadataFieldName>,
    /// Value to match (all item types except range).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<SearchTerm>,
    /// Bounds (range items only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeBounds>,
    /// Restricts the match to one metadata element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xpath: Option<String>,
    /// Restricts the match to one metadata profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_profile_id: Option<i64>,
}

fn default_metadata_field() -> FieldRef<MetadataFieldName> {
    FieldRef::Known(MetadataFieldName::default())
}

impl MetadataItem {
    /// Creates a text value item.
    pub fn new(item_type: ItemType, search_term: impl Into<SearchTerm>) -> Self {
        Self {
            item_type,
            field_name: default_metadata_field(),
            search_term: Some(search_term.into()),
            range: None,
            xpath: None,
            metadata_profile_id: None,
        }
    }

    /// Creates a range item on a numeric value field.
    pub fn range(field_name: impl Into<FieldRef<MetadataFieldName>>, range: RangeBounds) -> Self {
        Self {
            item_type: ItemType::Range,
            field_name: field_name.into(),
            search_term: None,
            range: Some(range),
            xpath: None,
            metadata_profile_id: None,
        }
    }

    /// Sets the value field.
    pub fn with_field(mut self, field_name: impl Into<FieldRef<MetadataFieldName>>) -> Self {
        self.field_name = field_name.into();
        self
    }

    /// Restricts the match to one metadata element.
    pub fn with_xpath(mut self, xpath: impl Into<String>) -> Self {
        self.xpath = Some(xpath.into());
        self
    }

    /// Restricts the match to one metadata profile.
    pub fn with_profile_id(mut self, profile_id: i64) -> Self {
        self.metadata_profile_id = Some(profile_id);
        self
    }

    /// Metadata value fields that accept the given match kind.
    pub fn allowed_fields_for_type(item_type: ItemType) -> Vec<MetadataFieldName> {
        MetadataFieldName::allowed_fields_for_type(item_type)
    }

    /// The element path constraint, if one is set and not blank.
    pub fn xpath_filter(&self) -> Option<&str> {
        self.xpath.as_deref().filter(|xpath| !xpath.trim().is_empty())
    }

    /// The profile constraint, if one is set and non-zero.
    pub fn profile_id_filter(&self) -> Option<i64> {
        self.metadata_profile_id.filter(|&profile_id| profile_id != 0)
    }

    fn validate(&self, registry: &FieldMappingRegistry) -> CompileResult<()> {
        check_field_ref(&self.field_name, self.item_type, registry)?;
        check_term(
            Category::Metadata,
            self.field_name.key(),
            self.item_type,
            self.search_term.as_ref(),
            self.range.as_ref(),
        )?;
        if self.xpath_filter().is_some() {
            registry.resolve(Category::Metadata, crate::mapping::METADATA_XPATH_KEY)?;
        }
        if self.profile_id_filter().is_some() {
            registry.resolve(Category::Metadata, crate::mapping::METADATA_PROFILE_ID_KEY)?;
        }
        Ok(())
    }
}

/// Status of an entry's membership in a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryEntryStatus {
    /// Awaiting moderation.
    Pending,
    /// Published in the category.
    #[default]
    Active,
    /// Removed from the category.
    Deleted,
    /// Rejected by moderation.
    Rejected,
}

impl CategoryEntryStatus {
    /// The numeric value stored in the index.
    pub fn search_value(&self) -> u8 {
        match self {
            CategoryEntryStatus::Pending => 1,
            CategoryEntryStatus::Active => 2,
            CategoryEntryStatus::Deleted => 3,
            CategoryEntryStatus::Rejected => 4,
        }
    }
}

impl fmt::Display for CategoryEntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryEntryStatus::Pending => write!(f, "pending"),
            CategoryEntryStatus::Active => write!(f, "active"),
            CategoryEntryStatus::Deleted => write!(f, "deleted"),
            CategoryEntryStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A predicate on category membership.
///
/// Membership is indexed as a single keyword field holding tokens that
/// combine a category id with the membership status. The item is rewritten
/// into such a token before compiling:
///
/// - `ancestor_id` → `p{id}s{status}` (the entry is in the category or a descendant)
/// - `id` → `c{id}s{status}` (the entry is directly in the category)
///
/// where `{status}` is [`CategoryEntryStatus::search_value`] of the item's
/// status, defaulting to active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntryItem {
    /// Match kind.
    pub item_type: ItemType,
    /// Membership field.
    pub field_name: CategoryEntryFieldName,
    /// Category id.
    pub search_term: SearchTerm,
    /// Membership status to match; active when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_entry_status: Option<CategoryEntryStatus>,
}

impl CategoryEntryItem {
    /// Creates an item matching entries in the category or any descendant.
    pub fn ancestor_id(ancestor_id: impl Into<SearchTerm>) -> Self {
        Self {
            item_type: ItemType::ExactMatch,
            field_name: CategoryEntryFieldName::AncestorId,
            search_term: ancestor_id.into(),
            category_entry_status: None,
        }
    }

    /// Creates an item matching entries directly in the category.
    pub fn category_id(category_id: impl Into<SearchTerm>) -> Self {
        Self {
            item_type: ItemType::ExactMatch,
            field_name: CategoryEntryFieldName::Id,
            search_term: category_id.into(),
            category_entry_status: None,
        }
    }

    /// Sets the match kind.
    pub fn with_item_type(mut self, item_type: ItemType) -> Self {
        self.item_type = item_type;
        self
    }

    /// Sets the membership status to match.
    pub fn with_status(mut self, status: CategoryEntryStatus) -> Self {
        self.category_entry_status = Some(status);
        self
    }

    /// Category entry fields that accept the given match kind.
    pub fn allowed_fields_for_type(item_type: ItemType) -> Vec<CategoryEntryFieldName> {
        CategoryEntryFieldName::allowed_fields_for_type(item_type)
    }

    /// The status value combined into the membership token.
    pub fn category_entry_status_search_value(&self) -> u8 {
        self.category_entry_status.unwrap_or_default().search_value()
    }

    /// Returns the membership token this item searches for.
    pub fn membership_token(&self) -> CompileResult<String> {
        let id = match &self.search_term {
            SearchTerm::Number(n) => n.to_string(),
            SearchTerm::Text(s) => s.trim().to_string(),
        };
        if id.is_empty() {
            return Err(CompileError::InvalidSearchTerm {
                category: Category::CategoryEntry,
                field: self.field_name.key().to_string(),
                message: "category id is empty".to_string(),
            });
        }
        let status = self.category_entry_status_search_value();
        Ok(match self.field_name {
            CategoryEntryFieldName::AncestorId => format!("p{}s{}", id, status),
            CategoryEntryFieldName::Id => format!("c{}s{}", id, status),
        })
    }

    fn validate(&self, registry: &FieldMappingRegistry) -> CompileResult<()> {
        check_known_field(self.field_name, self.item_type, registry)?;
        self.membership_token().map(|_| ())
    }
}

/// Checks a possibly dynamic field reference: item type allowed and path resolvable.
fn check_field_ref<F: FieldName>(
    field: &FieldRef<F>,
    item_type: ItemType,
    registry: &FieldMappingRegistry,
) -> CompileResult<()> {
    if let Some(known) = field.known() {
        return check_known_field(known, item_type, registry);
    }

    let key = field.key();
    let dynamic = registry
        .dynamic_field(F::CATEGORY, key)
        .ok_or_else(|| CompileError::UnresolvedField {
            category: F::CATEGORY,
            field: key.to_string(),
        })?;
    if !dynamic.item_types.contains(&item_type) {
        return Err(CompileError::InvalidFieldForType {
            category: F::CATEGORY,
            field: key.to_string(),
            item_type,
        });
    }
    Ok(())
}

fn check_known_field<F: FieldName>(
    field: F,
    item_type: ItemType,
    registry: &FieldMappingRegistry,
) -> CompileResult<()> {
    if !field.allowed_item_types().contains(&item_type) {
        return Err(CompileError::InvalidFieldForType {
            category: F::CATEGORY,
            field: field.key().to_string(),
            item_type,
        });
    }
    registry.resolve_field(F::CATEGORY, field.key())?;
    Ok(())
}

/// Checks that the item carries what its match kind needs.
fn check_term(
    category: Category,
    field: &str,
    item_type: ItemType,
    search_term: Option<&SearchTerm>,
    range: Option<&RangeBounds>,
) -> CompileResult<()> {
    let invalid = |message: &str| CompileError::InvalidSearchTerm {
        category,
        field: field.to_string(),
        message: message.to_string(),
    };

    if item_type == ItemType::Range {
        let range = range.ok_or_else(|| CompileError::MissingSearchTerm {
            category,
            field: field.to_string(),
            item_type,
        })?;
        if range.is_empty() {
            return Err(invalid("range has no bounds"));
        }
        if let Some(conflict) = range.conflict() {
            return Err(invalid(&conflict));
        }
        return Ok(());
    }

    if range.is_some() {
        return Err(invalid("range bounds are only valid for range items"));
    }
    let term = search_term.ok_or_else(|| CompileError::MissingSearchTerm {
        category,
        field: field.to_string(),
        item_type,
    })?;
    if term.is_blank() {
        return Err(invalid("search term is empty"));
    }
    Ok(())
}
