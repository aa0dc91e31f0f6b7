pub mod unit;

/// A macro to measure the evaluation time of an expression. Wraps an
/// expression, logs how long it took to evaluate, and evaluates to the value
/// of the expression.
#[macro_export]
macro_rules! timed {
    ($label:expr, $ex:expr) => {
        $crate::timed!($label, log::Level::Debug, $ex)
    };
    ($label:expr, $log_level:expr, $ex:expr) => {{
        let now = std::time::Instant::now();
        let value = $ex;
        let elapsed = now.elapsed();
        log::log!($log_level, "{} took {} ms", $label, elapsed.as_millis());
        value
    }};
}

/// Calculate the number of hexagons in a grid with the given dimensions. We
/// use this to size allocations up front.
pub fn grid_len(rows: usize, cols: usize) -> usize {
    rows * cols
}
