// Compiled to nothing unless the `debug_print` feature is enabled.

#[cfg(feature = "debug_print")]
#[macro_export]
macro_rules! debug_print {
    ($($args:tt)*) => {
        println!($($args)*)
    };
}

#[cfg(not(feature = "debug_print"))]
#[macro_export]
macro_rules! debug_print {
    ($($args:tt)*) => {};
}
