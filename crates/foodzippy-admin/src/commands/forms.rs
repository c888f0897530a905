//! `forms` and `vendor-types` subcommands

use super::Context;
use crate::output::{Table, or_dash, yes_no};
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use foodzippy_client::FormBuilder;
use foodzippy_core::form::{NewVendorType, SectionDraft, VendorTypeUpdate, sequential_order};
use foodzippy_core::{FieldDraft, FieldType, FormField, FormLayout, FormSection, VendorType};
use serde_json::json;
use tracing::debug;

/// Registration form layout
#[derive(Subcommand)]
pub enum FormCommands {
    /// Show the form of a vendor type
    Show {
        #[command(flatten)]
        target: FormTarget,
    },

    /// Turn a field on or off
    Toggle {
        /// Field id
        field_id: String,

        #[command(flatten)]
        target: FormTarget,
    },

    /// Flip whether a field must be answered
    Require {
        /// Field id
        field_id: String,

        #[command(flatten)]
        target: FormTarget,
    },

    /// Move a field within its section
    Move {
        /// Field id
        field_id: String,

        /// Move towards the top instead of the bottom
        #[arg(long)]
        up: bool,

        #[command(flatten)]
        target: FormTarget,
    },

    /// Add a field to a section
    AddField {
        /// Section key
        #[arg(long)]
        section: String,

        #[command(flatten)]
        field: FieldArgs,

        #[command(flatten)]
        target: FormTarget,
    },

    /// Change a field; unset flags keep their value
    EditField {
        /// Field id
        field_id: String,

        /// New label
        #[arg(long)]
        label: Option<String>,

        /// New placeholder
        #[arg(long)]
        placeholder: Option<String>,

        /// New help text
        #[arg(long = "help-text")]
        help_text: Option<String>,

        /// Replace the choices of a select field
        #[arg(long = "option")]
        options: Vec<String>,

        #[command(flatten)]
        target: FormTarget,
    },

    /// Delete a field
    DeleteField {
        /// Field id
        field_id: String,

        #[command(flatten)]
        target: FormTarget,
    },

    /// Manage form sections
    Sections {
        /// Section subcommand
        #[command(subcommand)]
        action: SectionCommands,
    },
}

/// Which vendor type's form to work on
#[derive(Args)]
pub struct FormTarget {
    /// Vendor type slug; defaults to the first active type
    #[arg(short = 't', long = "vendor-type")]
    vendor_type: Option<String>,
}

/// A new field
#[derive(Args)]
pub struct FieldArgs {
    /// Label shown to agents
    #[arg(long)]
    label: String,

    /// Storage key in the vendor's form data
    #[arg(long)]
    key: String,

    /// Widget, e.g. text, select, date
    #[arg(long = "type", default_value = "text")]
    field_type: FieldType,

    /// Answer is mandatory
    #[arg(long)]
    required: bool,

    /// Placeholder text
    #[arg(long, default_value = "")]
    placeholder: String,

    /// Help text
    #[arg(long = "help-text", default_value = "")]
    help_text: String,

    /// Choice for select widgets; repeat for several
    #[arg(long = "option")]
    options: Vec<String>,
}

/// Form sections
#[derive(Subcommand)]
pub enum SectionCommands {
    /// List every section, active or not
    List,

    /// Create a section
    Create {
        /// Stable key
        #[arg(long)]
        key: String,

        /// Label
        #[arg(long)]
        label: String,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Wizard step
        #[arg(long, default_value = "1")]
        step: u32,

        /// Position within the step
        #[arg(long, default_value = "1")]
        order: u32,

        /// Vendor type slug the section applies to; repeat for several
        #[arg(long = "vendor-type")]
        vendor_types: Vec<String>,
    },

    /// Turn a section on or off
    SetActive {
        /// Section id
        id: String,

        /// New state
        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
    },

    /// Delete a section
    Delete {
        /// Section id
        id: String,
    },
}

/// Vendor categories
#[derive(Subcommand)]
pub enum VendorTypeCommands {
    /// List vendor types
    List {
        /// Only active types
        #[arg(long)]
        active: bool,
    },

    /// Show one vendor type
    Show {
        /// Vendor type id
        id: String,
    },

    /// Create a vendor type
    Create {
        /// Display name
        name: String,

        /// Slug; derived from the name when omitted
        #[arg(long)]
        slug: Option<String>,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Icon name
        #[arg(long)]
        icon: Option<String>,

        /// Position
        #[arg(long)]
        order: Option<u32>,
    },

    /// Change a vendor type
    Update {
        /// Vendor type id
        id: String,

        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Icon name
        #[arg(long)]
        icon: Option<String>,

        /// Position
        #[arg(long)]
        order: Option<u32>,
    },

    /// Offer or withdraw a vendor type
    Toggle {
        /// Vendor type id
        id: String,
    },

    /// Delete a vendor type
    Delete {
        /// Vendor type id
        id: String,
    },

    /// Set the display order to the given sequence
    Reorder {
        /// Vendor type ids, first to last
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
}

async fn open_builder(ctx: &Context, target: &FormTarget) -> Result<FormBuilder> {
    let mut builder = FormBuilder::load(ctx.client().clone()).await?;
    if let Some(slug) = &target.vendor_type {
        builder.select(slug).await?;
    }
    Ok(builder)
}

fn find_field(builder: &FormBuilder, field_id: &str) -> Result<FormField> {
    builder.field(field_id).cloned().with_context(|| {
        format!(
            "Field {field_id} is not on the {} form",
            builder.selected().unwrap_or("default")
        )
    })
}

/// Run a `forms` subcommand
///
/// # Errors
///
/// Returns a validation error for system fields and unknown ids, or the
/// request error.
pub async fn handle_forms(ctx: &Context, action: FormCommands) -> Result<()> {
    match action {
        FormCommands::Show { target } => {
            let builder = open_builder(ctx, &target).await?;
            print_layout(ctx, &builder)?;
        }
        FormCommands::Toggle { field_id, target } => {
            let mut builder = open_builder(ctx, &target).await?;
            let field = find_field(&builder, &field_id)?;
            builder.toggle_active(&field).await?;
            let state = builder.field(&field_id).map_or(!field.is_active, |f| f.is_active);
            ctx.out().done(&format!(
                "{} is now {}",
                field.label,
                if state { "active" } else { "inactive" }
            ));
        }
        FormCommands::Require { field_id, target } => {
            let mut builder = open_builder(ctx, &target).await?;
            let field = find_field(&builder, &field_id)?;
            builder.toggle_required(&field).await?;
            ctx.out().done(&format!(
                "{} is now {}",
                field.label,
                if field.required { "optional" } else { "required" }
            ));
        }
        FormCommands::Move {
            field_id,
            up,
            target,
        } => {
            let mut builder = open_builder(ctx, &target).await?;
            builder.move_field(&field_id, up).await?;
            print_layout(ctx, &builder)?;
        }
        FormCommands::AddField {
            section,
            field,
            target,
        } => {
            let mut builder = open_builder(ctx, &target).await?;
            let mut draft = builder
                .layout()
                .sections()
                .find(|s| s.section_key == section)
                .map_or_else(
                    || FieldDraft {
                        section: section.clone(),
                        ..FieldDraft::default()
                    },
                    FieldDraft::for_section,
                );
            draft.label = field.label;
            draft.field_key = field.key;
            draft.field_type = field.field_type;
            draft.required = field.required;
            draft.placeholder = field.placeholder;
            draft.help_text = field.help_text;
            for option in &field.options {
                draft.add_option(option);
            }
            draft.order = next_order(builder.layout(), &draft.section);
            debug!(section = %draft.section, order = draft.order, "Adding field");
            let saved = builder.save_field(None, &draft).await?;
            ctx.out()
                .emit(&saved, || println!("Added {} ({})", saved.label, saved.id))?;
        }
        FormCommands::EditField {
            field_id,
            label,
            placeholder,
            help_text,
            options,
            target,
        } => {
            let mut builder = open_builder(ctx, &target).await?;
            let field = find_field(&builder, &field_id)?;
            let mut draft = FieldDraft::from_field(&field);
            if let Some(label) = label {
                draft.label = label;
            }
            if let Some(placeholder) = placeholder {
                draft.placeholder = placeholder;
            }
            if let Some(help_text) = help_text {
                draft.help_text = help_text;
            }
            if !options.is_empty() {
                draft.options.clear();
                for option in &options {
                    draft.add_option(option);
                }
            }
            let saved = builder.save_field(Some(&field), &draft).await?;
            ctx.out()
                .emit(&saved, || println!("Saved {}", saved.label))?;
        }
        FormCommands::DeleteField { field_id, target } => {
            let mut builder = open_builder(ctx, &target).await?;
            let field = find_field(&builder, &field_id)?;
            builder.delete_field(&field).await?;
            ctx.out().done(&format!("Deleted {}", field.label));
        }
        FormCommands::Sections { action } => handle_sections(ctx, action).await?,
    }
    Ok(())
}

fn next_order(layout: &FormLayout, section_key: &str) -> u32 {
    layout
        .sections()
        .filter(|s| s.section_key == section_key)
        .flat_map(|s| s.fields.iter().map(|f| f.order))
        .max()
        .map_or(1, |order| order + 1)
}

async fn handle_sections(ctx: &Context, action: SectionCommands) -> Result<()> {
    let client = ctx.client();
    match action {
        SectionCommands::List => {
            let sections = client.list_sections().await?;
            ctx.out().emit(&sections, || print_sections(&sections))?;
        }
        SectionCommands::Create {
            key,
            label,
            description,
            step,
            order,
            vendor_types,
        } => {
            let mut draft = SectionDraft::new(key, label);
            draft.section_description = description;
            draft.step_number = step;
            draft.order = order;
            draft.vendor_types = vendor_types;
            let section = client.create_section(&draft).await?;
            ctx.out().emit(&section, || {
                println!("Created section {} ({})", section.section_label, section.id);
            })?;
        }
        SectionCommands::SetActive { id, active } => {
            let section = client
                .update_section(&id, &json!({ "isActive": active }))
                .await?;
            ctx.out().emit(&section, || {
                println!(
                    "{} is now {}",
                    section.section_label,
                    if section.is_active { "active" } else { "inactive" }
                );
            })?;
        }
        SectionCommands::Delete { id } => {
            client.delete_section(&id).await?;
            ctx.out().done(&format!("Deleted section {id}"));
        }
    }
    Ok(())
}

/// Run a `vendor-types` subcommand
///
/// # Errors
///
/// Returns a validation error for a nameless type, or the request error.
pub async fn handle_vendor_types(ctx: &Context, action: VendorTypeCommands) -> Result<()> {
    let client = ctx.client();
    match action {
        VendorTypeCommands::List { active } => {
            let types = client.list_vendor_types(active).await?;
            ctx.out().emit(&types, || print_vendor_types(&types))?;
        }
        VendorTypeCommands::Show { id } => {
            let vendor_type = client.get_vendor_type(&id).await?;
            ctx.out()
                .emit(&vendor_type, || print_vendor_types(std::slice::from_ref(&vendor_type)))?;
        }
        VendorTypeCommands::Create {
            name,
            slug,
            description,
            icon,
            order,
        } => {
            let mut new_type = NewVendorType::named(name);
            if let Some(slug) = slug {
                new_type.slug = slug;
            }
            new_type.description = description;
            new_type.icon = icon;
            new_type.order = order;
            let created = client.create_vendor_type(&new_type).await?;
            ctx.out()
                .emit(&created, || println!("Created {} ({})", created.name, created.slug))?;
        }
        VendorTypeCommands::Update {
            id,
            name,
            description,
            icon,
            order,
        } => {
            let update = VendorTypeUpdate {
                name,
                description,
                icon,
                is_active: None,
                order,
            };
            let updated = client.update_vendor_type(&id, &update).await?;
            ctx.out()
                .emit(&updated, || println!("Updated {}", updated.name))?;
        }
        VendorTypeCommands::Toggle { id } => {
            let current = client.get_vendor_type(&id).await?;
            let update = VendorTypeUpdate {
                is_active: Some(!current.is_active),
                ..VendorTypeUpdate::default()
            };
            let updated = client.update_vendor_type(&id, &update).await?;
            ctx.out().emit(&updated, || {
                println!(
                    "{} is now {}",
                    updated.name,
                    if updated.is_active { "active" } else { "inactive" }
                );
            })?;
        }
        VendorTypeCommands::Delete { id } => {
            client.delete_vendor_type(&id).await?;
            ctx.out().done(&format!("Deleted vendor type {id}"));
        }
        VendorTypeCommands::Reorder { ids } => {
            client.reorder_vendor_types(&sequential_order(&ids)).await?;
            ctx.out().done(&format!("Reordered {} vendor types", ids.len()));
        }
    }
    Ok(())
}

fn print_layout(ctx: &Context, builder: &FormBuilder) -> Result<()> {
    let layout = builder.layout();
    let sections: Vec<&FormSection> = layout.sections().collect();
    ctx.out().emit(&sections, || {
        println!(
            "Form for {} ({} fields)",
            builder.selected().unwrap_or("all vendor types"),
            layout.field_count()
        );
        for step in layout.step_numbers() {
            for section in layout.step(step) {
                println!("\nStep {step} / {} [{}]", section.section_label, section.section_key);
                let mut table =
                    Table::new(&["ID", "LABEL", "KEY", "TYPE", "REQUIRED", "ACTIVE", "SYSTEM"]);
                for field in &section.fields {
                    table.row([
                        field.id.clone(),
                        field.label.clone(),
                        field.field_key.clone(),
                        field.field_type.to_string(),
                        yes_no(field.required).to_string(),
                        yes_no(field.is_active).to_string(),
                        yes_no(field.is_system_field).to_string(),
                    ]);
                }
                table.print_or("  (no fields)");
            }
        }
    })
}

fn print_sections(sections: &[FormSection]) {
    let mut table = Table::new(&["ID", "KEY", "LABEL", "STEP", "ORDER", "ACTIVE", "FIELDS"]);
    for section in sections {
        table.row([
            section.id.clone(),
            section.section_key.clone(),
            section.section_label.clone(),
            section.step_number.to_string(),
            section.order.to_string(),
            yes_no(section.is_active).to_string(),
            section.fields.len().to_string(),
        ]);
    }
    table.print_or("No sections defined");
}

fn print_vendor_types(types: &[VendorType]) {
    let mut table = Table::new(&["ID", "NAME", "SLUG", "ORDER", "ACTIVE", "DESCRIPTION"]);
    for vendor_type in types {
        table.row([
            vendor_type.id.clone(),
            vendor_type.name.clone(),
            vendor_type.slug.clone(),
            vendor_type.order.to_string(),
            yes_no(vendor_type.is_active).to_string(),
            or_dash(Some(vendor_type.description.as_str())),
        ]);
    }
    table.print_or("No vendor types defined");
}
