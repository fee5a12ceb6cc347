//! Declaration classification.
//!
//! Decides whether an identifier occurrence names something worth a tag.
//! The rule is an allow-list over [`Binding`]: types, fields, functions and
//! values. Anything else (parameters, locals, labels, imports, plain uses)
//! is rejected.

use crate::syntax::{Binding, Ident};

/// Whether a declaration construct produces tags.
pub fn is_indexable_binding(binding: Binding) -> bool {
    match binding {
        Binding::Type | Binding::Field | Binding::Func | Binding::Value => true,
        Binding::Parameter
        | Binding::TypeParameter
        | Binding::ShortVar
        | Binding::Label
        | Binding::Import => false,
    }
}

/// Whether an identifier occurrence is an indexable declaration.
///
/// Occurrences without a binding (uses, `_`) are never indexable.
pub fn is_indexable(ident: &Ident) -> bool {
    ident.binding.is_some_and(is_indexable_binding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list() {
        assert!(is_indexable_binding(Binding::Type));
        assert!(is_indexable_binding(Binding::Field));
        assert!(is_indexable_binding(Binding::Func));
        assert!(is_indexable_binding(Binding::Value));

        assert!(!is_indexable_binding(Binding::Parameter));
        assert!(!is_indexable_binding(Binding::TypeParameter));
        assert!(!is_indexable_binding(Binding::ShortVar));
        assert!(!is_indexable_binding(Binding::Label));
        assert!(!is_indexable_binding(Binding::Import));
    }

    #[test]
    fn test_uses_are_rejected() {
        assert!(!is_indexable(&Ident::new("Config", 10, None)));
    }

    #[test]
    fn test_declarations_are_accepted() {
        assert!(is_indexable(&Ident::new("Config", 10, Some(Binding::Type))));
        assert!(is_indexable(&Ident::new("Name", 30, Some(Binding::Field))));
    }

    #[test]
    fn test_blank_is_rejected() {
        let blank = Ident::new("_", 0, Some(Binding::Value));
        assert!(blank.is_blank());
        assert!(!is_indexable(&blank));
    }
}
