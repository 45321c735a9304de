use tracing::debug;

use crate::domain::entities::highlight::{ColorTag, Palette};
use crate::domain::entities::options::{FilterPolicy, StopPolicy};
use crate::domain::entities::order_line::OrderLine;

/// Lines whose select marker is exactly `target`, in input order.
pub fn filter_by_marker(lines: Vec<OrderLine>, target: &ColorTag) -> Vec<OrderLine> {
    lines
        .into_iter()
        .filter(|line| line.select_marker.as_ref() == Some(target))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Skip,
    Stop,
    Selected,
    Unmarked,
}

/// Skip wins over stop, stop wins over select.
pub fn classify(line: &OrderLine, palette: &Palette) -> Disposition {
    if line.skip_marker.as_ref() == Some(&palette.skip) {
        Disposition::Skip
    } else if line.stop_marker.as_ref() == Some(&palette.stop) {
        Disposition::Stop
    } else if line.select_marker.as_ref() == Some(&palette.select) {
        Disposition::Selected
    } else {
        Disposition::Unmarked
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterStats {
    pub scanned: usize,
    pub selected: usize,
    pub skipped: usize,
    pub stopped: usize,
    pub unmarked: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub lines: Vec<OrderLine>,
    pub stats: FilterStats,
}

impl Selection {
    /// Zero-based data-row ordinals of the selected lines.
    pub fn ordinals(&self) -> Vec<usize> {
        self.lines.iter().map(|line| line.ordinal).collect()
    }
}

pub fn select_lines(lines: Vec<OrderLine>, palette: &Palette, policy: FilterPolicy) -> Selection {
    let selection = match policy {
        FilterPolicy::Marker => {
            let scanned = lines.len();
            let selected = filter_by_marker(lines, &palette.select);
            let stats = FilterStats {
                scanned,
                selected: selected.len(),
                unmarked: scanned - selected.len(),
                ..FilterStats::default()
            };
            Selection {
                lines: selected,
                stats,
            }
        }
        FilterPolicy::Disposition(stop_policy) => select_by_disposition(lines, palette, stop_policy),
    };
    debug!(?policy, stats = ?selection.stats, "filtered order lines");
    selection
}

fn select_by_disposition(
    lines: Vec<OrderLine>,
    palette: &Palette,
    stop_policy: StopPolicy,
) -> Selection {
    let mut selection = Selection::default();
    for line in lines {
        selection.stats.scanned += 1;
        match classify(&line, palette) {
            Disposition::Skip => selection.stats.skipped += 1,
            Disposition::Stop => {
                selection.stats.stopped += 1;
                if stop_policy == StopPolicy::EndScan {
                    debug!(row = line.source_row, "stop marker ends scan");
                    break;
                }
            }
            Disposition::Selected => {
                selection.stats.selected += 1;
                selection.lines.push(line);
            }
            Disposition::Unmarked => selection.stats.unmarked += 1,
        }
    }
    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::highlight::Highlight;
    use crate::domain::entities::sheet::CellValue;
    use proptest::prelude::*;

    fn line(ordinal: usize, order: &str) -> OrderLine {
        OrderLine {
            source_row: ordinal as u32 + 2,
            ordinal,
            order_id: CellValue::Text(order.to_string()),
            item_id: CellValue::Text(format!("ITEM-{ordinal}")),
            required_qty: CellValue::Number(1.0),
            group_key: CellValue::Text(order.to_string()),
            select_marker: None,
            skip_marker: None,
            stop_marker: None,
        }
    }

    fn marked(mut l: OrderLine, select: Option<Highlight>) -> OrderLine {
        l.select_marker = select.map(ColorTag::from);
        l
    }

    #[test]
    fn marker_filter_keeps_exact_matches_in_order() {
        let lines = vec![
            marked(line(0, "B"), Some(Highlight::Green)),
            marked(line(1, "A"), None),
            marked(line(2, "C"), Some(Highlight::Green)),
            marked(line(3, "D"), Some(Highlight::Blue)),
        ];
        let out = filter_by_marker(lines, &Highlight::Green.into());
        let ordinals: Vec<usize> = out.iter().map(|l| l.ordinal).collect();
        assert_eq!(ordinals, vec![0, 2]);
    }

    #[test]
    fn unrecognized_tag_is_excluded() {
        let mut black = line(0, "A");
        black.select_marker = Some(ColorTag::new("FF000000"));
        let mut lowercase = line(1, "A");
        lowercase.select_marker = Some(ColorTag::new("ff92d050"));
        let selection = select_lines(
            vec![black, lowercase],
            &Palette::default(),
            FilterPolicy::Marker,
        );
        assert!(selection.lines.is_empty());
        assert_eq!(selection.stats.unmarked, 2);
    }

    fn disposition_fixture() -> Vec<OrderLine> {
        let mut skipped = marked(line(1, "B"), Some(Highlight::Green));
        skipped.skip_marker = Some(Highlight::White.into());
        let mut stopped = marked(line(2, "C"), Some(Highlight::Green));
        stopped.stop_marker = Some(Highlight::Red.into());
        vec![
            marked(line(0, "A"), Some(Highlight::Green)),
            skipped,
            stopped,
            marked(line(3, "D"), None),
            marked(line(4, "E"), Some(Highlight::Green)),
        ]
    }

    #[test]
    fn disposition_skip_beats_stop_beats_select() {
        let palette = Palette::default();
        let mut both = line(0, "A");
        both.skip_marker = Some(Highlight::White.into());
        both.stop_marker = Some(Highlight::Red.into());
        both.select_marker = Some(Highlight::Green.into());
        assert_eq!(classify(&both, &palette), Disposition::Skip);
        both.skip_marker = None;
        assert_eq!(classify(&both, &palette), Disposition::Stop);
        both.stop_marker = None;
        assert_eq!(classify(&both, &palette), Disposition::Selected);
    }

    #[test]
    fn disposition_ignore_row_keeps_scanning() {
        let selection = select_lines(
            disposition_fixture(),
            &Palette::default(),
            FilterPolicy::Disposition(StopPolicy::IgnoreRow),
        );
        assert_eq!(selection.ordinals(), vec![0, 4]);
        assert_eq!(
            selection.stats,
            FilterStats {
                scanned: 5,
                selected: 2,
                skipped: 1,
                stopped: 1,
                unmarked: 1,
            }
        );
    }

    #[test]
    fn disposition_end_scan_stops_at_first_stop_row() {
        let selection = select_lines(
            disposition_fixture(),
            &Palette::default(),
            FilterPolicy::Disposition(StopPolicy::EndScan),
        );
        assert_eq!(selection.ordinals(), vec![0]);
        assert_eq!(selection.stats.scanned, 3);
        assert_eq!(selection.stats.stopped, 1);
    }

    fn arb_marker() -> impl Strategy<Value = Option<ColorTag>> {
        prop_oneof![
            Just(None),
            Just(Some(ColorTag::from(Highlight::Green))),
            Just(Some(ColorTag::from(Highlight::Red))),
            Just(Some(ColorTag::new("FF000000"))),
        ]
    }

    proptest! {
        #[test]
        fn marker_filter_is_an_ordered_subsequence(markers in prop::collection::vec(arb_marker(), 0..40)) {
            let lines: Vec<OrderLine> = markers
                .iter()
                .enumerate()
                .map(|(i, m)| {
                    let mut l = line(i, "A");
                    l.select_marker = m.clone();
                    l
                })
                .collect();
            let target = ColorTag::from(Highlight::Green);
            let out = filter_by_marker(lines, &target);

            let ordinals: Vec<usize> = out.iter().map(|l| l.ordinal).collect();
            prop_assert!(ordinals.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(out.iter().all(|l| l.select_marker.as_ref() == Some(&target)));
            let expected = markers.iter().filter(|m| m.as_ref() == Some(&target)).count();
            prop_assert_eq!(out.len(), expected);
        }
    }
}
