//! Section title markers on the trimmed timeline.

use tracing::debug;
use vcut_models::{seconds_to_ms, SectionMarker, TimeSpan};

use crate::config::SectionConfig;
use crate::interval::OffsetMap;

/// Stamp a section title at the first keep interval and after every
/// original-timeline gap of at least `section_gap_sec`.
///
/// Markers are placed at the keep interval's trimmed-timeline offset.
/// Sections beyond the configured title list get no marker.
pub fn generate_section_markers<S: TimeSpan>(keeps: &[S], config: &SectionConfig) -> Vec<SectionMarker> {
    let map = OffsetMap::new(keeps);
    let mut titles = config.titles.iter();
    let mut markers = Vec::new();

    for (i, entry) in map.entries().iter().enumerate() {
        let starts_section = match i.checked_sub(1).and_then(|p| map.entries().get(p)) {
            None => true,
            Some(prev) => entry.keep.start_sec - prev.keep.end_sec >= config.section_gap_sec,
        };
        if !starts_section {
            continue;
        }

        let Some(title) = titles.next() else {
            break;
        };
        markers.push(SectionMarker {
            title: title.clone(),
            start_ms: seconds_to_ms(entry.offset),
            duration_ms: config.display_ms,
        });
    }

    debug!(
        sections = markers.len(),
        keeps = keeps.len(),
        "Generated section markers"
    );

    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcut_models::KeepInterval;

    #[test]
    fn test_sections_after_long_gaps() {
        let keeps = [
            KeepInterval::new(0.0, 10.0),
            KeepInterval::new(10.5, 20.0),
            KeepInterval::new(25.0, 30.0),
            KeepInterval::new(40.0, 41.0),
        ];
        let markers = generate_section_markers(&keeps, &SectionConfig::default());

        let starts: Vec<_> = markers.iter().map(|m| m.start_ms).collect();
        assert_eq!(starts, vec![0, 19_500, 24_500]);
        assert_eq!(markers[0].title, "The Hook");
        assert_eq!(markers[2].title, "Real Talk");
        assert!(markers.iter().all(|m| m.duration_ms == 2000));
    }

    #[test]
    fn test_stops_when_titles_run_out() {
        let keeps: Vec<_> = (0..10)
            .map(|i| KeepInterval::new(i as f64 * 10.0, i as f64 * 10.0 + 5.0))
            .collect();
        let config = SectionConfig::default().with_titles(["Intro", "Outro"]);
        let markers = generate_section_markers(&keeps, &config);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[1].start_ms, 5000);
    }

    #[test]
    fn test_no_keeps_no_sections() {
        assert!(generate_section_markers::<KeepInterval>(&[], &SectionConfig::default()).is_empty());
    }
}
