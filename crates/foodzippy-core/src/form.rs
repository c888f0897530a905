//! Dynamic vendor registration form configuration
//!
//! The registration form agents fill in is stored server-side as sections of
//! fields. This module models that configuration, groups it into wizard steps
//! and validates field drafts before they are submitted.

use crate::types::{EntityId, Role};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Input widget of a form field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Single-line text
    #[default]
    Text,
    /// Email address
    Email,
    /// Masked text
    Password,
    /// Numeric input
    Number,
    /// Multi-line text
    Textarea,
    /// Dropdown
    Select,
    /// Multiple choice
    MultiSelect,
    /// Checkbox
    Checkbox,
    /// Yes/no toggle
    Boolean,
    /// File upload
    File,
    /// Date picker
    Date,
    /// Voice recording
    Voice,
    /// Widget this console does not know
    Other(String),
}

impl FieldType {
    /// Every known widget
    pub const KNOWN: [Self; 12] = [
        Self::Text,
        Self::Email,
        Self::Password,
        Self::Number,
        Self::Textarea,
        Self::Select,
        Self::MultiSelect,
        Self::Checkbox,
        Self::Boolean,
        Self::File,
        Self::Date,
        Self::Voice,
    ];

    /// Wire value
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Number => "number",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Checkbox => "checkbox",
            Self::Boolean => "boolean",
            Self::File => "file",
            Self::Date => "date",
            Self::Voice => "voice",
            Self::Other(other) => other,
        }
    }

    /// Human label used in pickers
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Text => "Text",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::Number => "Number",
            Self::Textarea => "Textarea",
            Self::Select => "Select (Dropdown)",
            Self::MultiSelect => "Multi-Select",
            Self::Checkbox => "Checkbox",
            Self::Boolean => "Boolean (Yes/No)",
            Self::File => "File Upload",
            Self::Date => "Date",
            Self::Voice => "Voice Recording",
            Self::Other(other) => other,
        }
    }

    /// Whether the widget takes a list of options
    #[must_use]
    pub const fn needs_options(&self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect)
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|known| known.as_str() == value)
            .unwrap_or(Self::Other(value))
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

fn default_visible_to() -> Vec<Role> {
    vec![Role::Agent, Role::Employee]
}

const fn default_true() -> bool {
    true
}

const fn default_order() -> u32 {
    1
}

/// A configured form field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Field id
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Owning section key
    #[serde(default)]
    pub section: String,
    /// Owning section label
    #[serde(default)]
    pub section_label: String,
    /// Label shown to the agent
    #[serde(default)]
    pub label: String,
    /// Key under which answers are stored in `formData`
    #[serde(default)]
    pub field_key: String,
    /// Widget
    #[serde(default)]
    pub field_type: FieldType,
    /// Choices for select widgets
    #[serde(default)]
    pub options: Vec<String>,
    /// Placeholder
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Whether an answer is mandatory
    #[serde(default)]
    pub required: bool,
    /// Position within the section
    #[serde(default = "default_order")]
    pub order: u32,
    /// Roles that see the field
    #[serde(default = "default_visible_to")]
    pub visible_to: Vec<Role>,
    /// Whether the field is rendered
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Built-in field that cannot be deleted or made optional
    #[serde(default)]
    pub is_system_field: bool,
    /// Help text
    #[serde(default)]
    pub help_text: Option<String>,
    /// Vendor types the field applies to; empty means all
    #[serde(default)]
    pub vendor_types: Vec<String>,
    /// Label with `{vendorType}` style substitution
    #[serde(default)]
    pub label_template: Option<String>,
}

/// A configured form section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FormSection {
    /// Section id
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Stable key referenced by fields
    #[serde(default)]
    pub section_key: String,
    /// Label
    #[serde(default)]
    pub section_label: String,
    /// Description
    #[serde(default)]
    pub section_description: Option<String>,
    /// Position within the step
    #[serde(default = "default_order")]
    pub order: u32,
    /// Wizard step
    #[serde(default = "default_order")]
    pub step_number: u32,
    /// Whether the section is rendered
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Roles that see the section
    #[serde(default = "default_visible_to")]
    pub visible_to: Vec<Role>,
    /// Fields
    #[serde(default)]
    pub fields: Vec<FormField>,
    /// Vendor types the section applies to; empty means all
    #[serde(default)]
    pub vendor_types: Vec<String>,
    /// Label template
    #[serde(default)]
    pub label_template: Option<String>,
}

impl FormSection {
    /// Find a field by id
    #[must_use]
    pub fn field(&self, field_id: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.id == field_id)
    }
}

/// Sections grouped into wizard steps, everything sorted by `order`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormLayout {
    steps: BTreeMap<u32, Vec<FormSection>>,
}

impl FormLayout {
    /// Group sections by step number
    #[must_use]
    pub fn from_sections(sections: Vec<FormSection>) -> Self {
        let mut steps: BTreeMap<u32, Vec<FormSection>> = BTreeMap::new();
        for mut section in sections {
            section.fields.sort_by_key(|field| field.order);
            steps.entry(section.step_number).or_default().push(section);
        }
        for sections in steps.values_mut() {
            sections.sort_by_key(|section| section.order);
        }
        Self { steps }
    }

    /// Step numbers in ascending order
    pub fn step_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.steps.keys().copied()
    }

    /// Sections of one step
    #[must_use]
    pub fn step(&self, step_number: u32) -> &[FormSection] {
        self.steps.get(&step_number).map_or(&[], Vec::as_slice)
    }

    /// Every section, step by step
    pub fn sections(&self) -> impl Iterator<Item = &FormSection> {
        self.steps.values().flatten()
    }

    /// Find a field anywhere in the layout
    #[must_use]
    pub fn find_field(&self, field_id: &str) -> Option<&FormField> {
        self.sections().find_map(|section| section.field(field_id))
    }

    /// Total number of fields
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.sections().map(|section| section.fields.len()).sum()
    }

    /// Whether no sections are configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Field create/edit payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDraft {
    /// Section key
    pub section: String,
    /// Section label
    pub section_label: String,
    /// Label
    pub label: String,
    /// Storage key
    pub field_key: String,
    /// Widget
    pub field_type: FieldType,
    /// Placeholder
    pub placeholder: String,
    /// Mandatory answer
    pub required: bool,
    /// Position within the section
    pub order: u32,
    /// Roles that see the field
    pub visible_to: Vec<Role>,
    /// Rendered
    pub is_active: bool,
    /// Built-in field
    pub is_system_field: bool,
    /// Help text
    pub help_text: String,
    /// Choices for select widgets
    pub options: Vec<String>,
}

impl Default for FieldDraft {
    fn default() -> Self {
        Self {
            section: String::new(),
            section_label: String::new(),
            label: String::new(),
            field_key: String::new(),
            field_type: FieldType::Text,
            placeholder: String::new(),
            required: false,
            order: 1,
            visible_to: default_visible_to(),
            is_active: true,
            is_system_field: false,
            help_text: String::new(),
            options: Vec::new(),
        }
    }
}

impl FieldDraft {
    /// Empty draft placed in `section`
    #[must_use]
    pub fn for_section(section: &FormSection) -> Self {
        Self {
            section: section.section_key.clone(),
            section_label: section.section_label.clone(),
            ..Self::default()
        }
    }

    /// Draft prefilled from an existing field
    #[must_use]
    pub fn from_field(field: &FormField) -> Self {
        Self {
            section: field.section.clone(),
            section_label: field.section_label.clone(),
            label: field.label.clone(),
            field_key: field.field_key.clone(),
            field_type: field.field_type.clone(),
            placeholder: field.placeholder.clone().unwrap_or_default(),
            required: field.required,
            order: field.order,
            visible_to: field.visible_to.clone(),
            is_active: field.is_active,
            is_system_field: field.is_system_field,
            help_text: field.help_text.clone().unwrap_or_default(),
            options: field.options.clone(),
        }
    }

    /// Whether the chosen widget takes options
    #[must_use]
    pub const fn needs_options(&self) -> bool {
        self.field_type.needs_options()
    }

    /// Append a trimmed, non-empty option
    pub fn add_option(&mut self, option: &str) {
        let option = option.trim();
        if !option.is_empty() {
            self.options.push(option.to_string());
        }
    }

    /// Remove the option at `index`, ignoring out-of-range indices
    pub fn remove_option(&mut self, index: usize) {
        if index < self.options.len() {
            self.options.remove(index);
        }
    }

    /// Check the fields every draft needs
    ///
    /// # Errors
    ///
    /// Returns a validation error for the first empty required field.
    pub fn validate(&self) -> crate::Result<()> {
        for (field, value) in [
            ("label", &self.label),
            ("fieldKey", &self.field_key),
            ("section", &self.section),
        ] {
            if value.trim().is_empty() {
                return Err(crate::Error::validation(
                    field,
                    "Label, field key and section are required",
                ));
            }
        }
        Ok(())
    }
}

/// Section create/edit payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SectionDraft {
    /// Stable key
    pub section_key: String,
    /// Label
    pub section_label: String,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_description: Option<String>,
    /// Position within the step
    pub order: u32,
    /// Wizard step
    pub step_number: u32,
    /// Rendered
    pub is_active: bool,
    /// Roles that see the section
    pub visible_to: Vec<Role>,
    /// Vendor types the section applies to
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vendor_types: Vec<String>,
}

impl SectionDraft {
    /// Draft with defaults for a new section
    pub fn new(section_key: impl Into<String>, section_label: impl Into<String>) -> Self {
        Self {
            section_key: section_key.into(),
            section_label: section_label.into(),
            section_description: None,
            order: 1,
            step_number: 1,
            is_active: true,
            visible_to: default_visible_to(),
            vendor_types: Vec::new(),
        }
    }

    /// Check the key and label are set
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty key or label.
    pub fn validate(&self) -> crate::Result<()> {
        if self.section_key.trim().is_empty() || self.section_label.trim().is_empty() {
            return Err(crate::Error::validation(
                "sectionKey",
                "Section key and label are required",
            ));
        }
        Ok(())
    }
}

/// Position update used by the reorder endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderEntry {
    /// Item id
    pub id: EntityId,
    /// New position
    pub order: u32,
}

/// Number the ids in the given sequence, starting at 1
#[must_use]
pub fn sequential_order(ids: &[EntityId]) -> Vec<OrderEntry> {
    ids.iter()
        .zip(1..)
        .map(|(id, order)| OrderEntry {
            id: id.clone(),
            order,
        })
        .collect()
}

/// Vendor category such as restaurant or bakery; drives which form is shown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VendorType {
    /// Id
    #[serde(rename = "_id")]
    pub id: EntityId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Slug used by vendors and form filters
    #[serde(default)]
    pub slug: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Icon name
    #[serde(default)]
    pub icon: String,
    /// Offered to agents
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Position
    #[serde(default)]
    pub order: u32,
}

/// Vendor type create payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewVendorType {
    /// Display name
    pub name: String,
    /// Slug
    pub slug: String,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl NewVendorType {
    /// Payload with a slug derived from the name
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            name,
            slug,
            description: None,
            icon: None,
            order: None,
        }
    }

    /// Check name and slug are set
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name or slug.
    pub fn validate(&self) -> crate::Result<()> {
        if self.name.trim().is_empty() || self.slug.trim().is_empty() {
            return Err(crate::Error::validation("name", "Name and slug are required"));
        }
        Ok(())
    }
}

/// Partial vendor type update
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VendorTypeUpdate {
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Offered to agents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

/// Lowercase, dash-separated slug
#[must_use]
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
