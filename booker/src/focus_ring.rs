/// Create an enum of buttons that focus can rotate through with tab and
/// shift-tab. The first variant is the default focus.
#[macro_export]
macro_rules! focus_ring {
    ($name:ident, $first:ident $(, $rest:ident)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub enum $name {
            #[default]
            $first,
            $($rest),*
        }

        impl $name {
            const BUTTONS: &'static [$name] = &[
                $name::$first,
                $($name::$rest),*
            ];

            /// Move focus to the next button (e.g. with tab)
            fn next(self) -> Self {
                Self::BUTTONS[(self as usize + 1) % Self::BUTTONS.len()]
            }

            /// Move focus to the previous button (e.g. with shift-tab)
            fn prev(self) -> Self {
                Self::BUTTONS[(self as usize + Self::BUTTONS.len() - 1) % Self::BUTTONS.len()]
            }
        }
    };
}
