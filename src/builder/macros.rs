//! Macros for ergonomic machine construction.

/// Generate a proposition alphabet from a simple enum.
///
/// Each variant may name the symbol it uses in guard strings; variants
/// without an explicit symbol use the variant name.
///
/// # Example
///
/// ```
/// use crm::core::Proposition;
/// use crm::propositions;
///
/// propositions! {
///     pub enum WarehouseEvent {
///         GripperClosed => "GRIPPER_CLOSED",
///         SafeRegion => "SAFE_REGION",
///         Idle,
///     }
/// }
///
/// assert_eq!(WarehouseEvent::GripperClosed.name(), "GRIPPER_CLOSED");
/// assert_eq!(WarehouseEvent::from_name("Idle"), Some(WarehouseEvent::Idle));
/// assert_eq!(WarehouseEvent::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! propositions {
    (@symbol $variant:ident $symbol:literal) => {
        $symbol
    };
    (@symbol $variant:ident) => {
        stringify!($variant)
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(=> $symbol:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Debug,
            serde::Serialize,
            serde::Deserialize
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every proposition of the alphabet, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [$name] = &[$(Self::$variant),*];
        }

        impl $crate::core::Proposition for $name {
            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $crate::propositions!(@symbol $variant $($symbol)?)),*
                }
            }

            fn from_name(name: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|p| $crate::core::Proposition::name(p) == name)
            }
        }
    };
}
