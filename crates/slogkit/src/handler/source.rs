//! Caller-location resolution by walking the stack
//!
//! Frames are counted from the frame that called [`resolve_caller`], which
//! is depth 0. Inlined functions count as frames of their
//! own, so the depth does not change with the optimization level as long as
//! debug info is present. Without symbols nothing resolves and the caller
//! gets `None`.

use backtrace::{Backtrace, BacktraceSymbol};

use crate::record::Location;

const ANCHOR: &str = "resolve_caller";

/// Location `skip` frames above the function calling this one
#[inline(never)]
pub(super) fn resolve_caller(skip: usize) -> Option<Location> {
    let bt = Backtrace::new();
    let symbols: Vec<&BacktraceSymbol> = bt.frames().iter().flat_map(|f| f.symbols()).collect();

    let anchor = symbols.iter().rposition(|symbol| is_anchor(symbol))?;
    let symbol = symbols.get(anchor.saturating_add(1).saturating_add(skip))?;

    let file = symbol.filename()?;
    let line = symbol.lineno()?;
    Some(Location::new(file.display().to_string(), line))
}

fn is_anchor(symbol: &BacktraceSymbol) -> bool {
    symbol
        .name()
        .map(|name| format!("{name:#}"))
        .is_some_and(|name| name.contains(ANCHOR) && name.contains("source"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline(never)]
    fn emit_frame(skip: usize) -> Option<Location> {
        resolve_caller(skip)
    }

    #[test]
    fn depth_zero_is_the_calling_frame() {
        let location = emit_frame(0).expect("test builds carry debug info");
        assert!(location.file.ends_with("source.rs"), "{location}");
    }

    #[test]
    fn walks_up_to_the_caller() {
        let line = line!() + 1;
        let location = emit_frame(1).expect("test builds carry debug info");
        assert!(location.file.ends_with("source.rs"), "{location}");
        assert_eq!(location.line, line);
    }

    #[test]
    fn too_deep_is_none() {
        assert!(emit_frame(10_000).is_none());
        assert!(emit_frame(usize::MAX).is_none());
    }
}
