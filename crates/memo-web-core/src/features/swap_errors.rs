//! Let error fragments from the server be swapped in like content.

use crate::dom::Dom;
use crate::page::Page;
use crate::registry::FeatureKey;

pub fn install<D: Dom>(page: &mut Page<D>) -> bool {
    page.register_once(FeatureKey::SwapErrors, |wiring| {
        let policy = wiring.config.swap.clone();
        wiring.hooks.on_before_swap(move |detail| {
            if policy.apply(detail) {
                tracing::trace!(status = detail.status, "swap forced by status policy");
            }
        });
    })
}

#[cfg(test)]
mod tests {
    use crate::config::ClientConfig;
    use crate::dom::MemoryDom;
    use crate::page::Page;
    use crate::swap::{SwapDetail, SwapPolicy};

    #[test]
    fn policy_overrides_engine_for_listed_codes() {
        let mut page = Page::new(MemoryDom::new(), ClientConfig::default());
        super::install(&mut page);

        for status in [400, 401, 403, 404, 422, 500, 200, 201, 204] {
            let detail = page.before_swap(status);
            assert_eq!(detail, SwapDetail { status, should_swap: true, is_error: false });
        }
        assert_eq!(page.before_swap(502), SwapDetail::engine_default(502));
    }

    #[test]
    fn configured_codes_are_used() {
        let config = ClientConfig {
            swap: SwapPolicy {
                error_codes: vec![409],
                success_codes: vec![],
            },
            ..ClientConfig::default()
        };
        let mut page = Page::new(MemoryDom::new(), config);
        super::install(&mut page);

        assert!(page.before_swap(409).should_swap);
        assert!(!page.before_swap(204).should_swap);
    }

    #[test]
    fn hook_is_attached_once() {
        let mut page = Page::new(MemoryDom::new(), ClientConfig::default());
        assert!(super::install(&mut page));
        assert!(!super::install(&mut page));
        assert_eq!(page.hooks().before_swap_hook_count(), 1);
    }
}
