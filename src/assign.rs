use crate::types::{Anchor, AnchorPolicy, HintKey, HintMapping, Target};

/// Pairs hint keys with targets in target order.
///
/// Assignment stops as soon as the keys run out; the remaining targets get no
/// hint. Under [`AnchorPolicy::Both`] a target at least
/// `both_ends_min_word_length` graphemes long (every target when unset) takes
/// two keys, start then end.
pub fn assign(
    targets: &[Target],
    hints: &[HintKey],
    policy: AnchorPolicy,
    both_ends_min_word_length: Option<usize>,
) -> Vec<HintMapping> {
    let mut mappings = Vec::with_capacity(targets.len().min(hints.len()));
    let mut keys = hints.iter();

    for target in targets {
        let Some(key) = keys.next() else {
            break;
        };
        match policy {
            AnchorPolicy::Start | AnchorPolicy::Overlay => {
                mappings.push(mapping(target, key, Anchor::Start));
            }
            AnchorPolicy::End => {
                mappings.push(mapping(target, key, Anchor::End));
            }
            AnchorPolicy::Both => {
                mappings.push(mapping(target, key, Anchor::Start));
                let eligible = both_ends_min_word_length
                    .is_none_or(|min| target.width as usize >= min);
                if eligible && let Some(end_key) = keys.next() {
                    mappings.push(mapping(target, end_key, Anchor::End));
                }
            }
        }
    }

    mappings
}

fn mapping(target: &Target, key: &HintKey, anchor: Anchor) -> HintMapping {
    let anchor_col = match anchor {
        Anchor::Start => target.col,
        Anchor::End => target.end_col(),
    };
    HintMapping {
        target: target.clone(),
        key: key.clone(),
        anchor_col,
        anchor,
    }
}
