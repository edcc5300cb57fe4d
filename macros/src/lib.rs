//! Derive macros for habitkit
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates classification helpers for action enums
//!
//! # Example
//!
//! ```ignore
//! use habitkit_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum HabitAction {
//!     #[command]
//!     AddHabit { name: String },
//!
//!     #[event]
//!     HabitAdded { id: String, name: String },
//! }
//!
//! assert!(HabitAction::AddHabit { name: "Read".into() }.is_command());
//! assert_eq!(HabitAction::AddHabit { name: "Read".into() }.action_name(), "AddHabit");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident, Variant};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_command()` - Returns true if this variant is a command
/// - `is_event()` - Returns true if this variant is an event
/// - `event_type()` - Versioned event type name (`"<Variant>.v1"`), `"unknown"` for non-events
/// - `action_name()` - Variant name of any action, for logging
///
/// # Attributes
///
/// - `#[command]` - Mark a variant as a command
/// - `#[event]` - Mark a variant as an event
///
/// Applying the derive to a non-enum, or marking a variant as both command
/// and event, is a compile error.
#[proc_macro_derive(Action, attributes(command, event))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(&input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut is_command_arms = Vec::new();
    let mut is_event_arms = Vec::new();
    let mut event_type_arms = Vec::new();
    let mut action_name_arms = Vec::new();

    for variant in &data_enum.variants {
        let is_command = has_attribute(&variant.attrs, "command");
        let is_event = has_attribute(&variant.attrs, "event");

        if is_command && is_event {
            return syn::Error::new_spanned(variant, "Variant cannot be both #[command] and #[event]")
                .to_compile_error()
                .into();
        }

        let pattern = variant_pattern(variant);

        if is_command {
            is_command_arms.push(quote! { #pattern => true, });
        }

        if is_event {
            is_event_arms.push(quote! { #pattern => true, });
            let type_name = format!("{}.v1", variant.ident);
            event_type_arms.push(quote! { #pattern => #type_name, });
        }

        let variant_name = variant.ident.to_string();
        action_name_arms.push(quote! { #pattern => #variant_name, });
    }

    let false_arm = quote! {
        #[allow(unreachable_patterns)]
        _ => false,
    };
    let unknown_arm = quote! {
        #[allow(unreachable_patterns)]
        _ => "unknown",
    };

    let expanded = quote! {
        impl #name {
            /// Returns true if this action is a command
            #[must_use]
            pub const fn is_command(&self) -> bool {
                match self {
                    #(#is_command_arms)*
                    #false_arm
                }
            }

            /// Returns true if this action is an event
            #[must_use]
            pub const fn is_event(&self) -> bool {
                match self {
                    #(#is_event_arms)*
                    #false_arm
                }
            }

            /// Returns the versioned event type name
            ///
            /// Only events have type names. Other actions return "unknown".
            #[must_use]
            pub const fn event_type(&self) -> &'static str {
                match self {
                    #(#event_type_arms)*
                    #unknown_arm
                }
            }

            /// Returns the variant name of this action
            #[must_use]
            pub const fn action_name(&self) -> &'static str {
                match self {
                    #(#action_name_arms)*
                    #unknown_arm
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Builds a match pattern that ignores the variant's fields
fn variant_pattern(variant: &Variant) -> TokenStream2 {
    let ident: &Ident = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
