//! # Block-Size Files
//!
//! Runs each strategy with `CsvBlockSizeSink` and checks the files it leaves
//! behind: one file per strategy and party, one line per build.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use pprl_01_sorted_neighbourhood::{
        SortedNeighbourhoodApi, SortedNeighbourhoodConfigBuilder, SortedNeighbourhoodService,
    };
    use pprl_02_psig::{PSigBlockingApi, PSigConfigBuilder, PSigService};
    use shared_types::{CsvBlockSizeSink, DescriptiveStatistics, Party};

    use crate::fixtures::{overlapping_parties, reference_values, SURNAME};

    fn parse_line(line: &str) -> Vec<usize> {
        line.split(',')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().expect("numeric size"))
            .collect()
    }

    #[test]
    fn test_sorted_neighbourhood_writes_one_file_per_party() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = Arc::new(CsvBlockSizeSink::new(dir.path()));
        let (alice, bob) = overlapping_parties(40, 10, 3);

        let config = SortedNeighbourhoodConfigBuilder::new().k(2).build().unwrap();
        let mut service =
            SortedNeighbourhoodService::with_ports(config, Arc::new(DescriptiveStatistics), sink.clone())
                .unwrap();
        service.load_records(Party::Alice, alice);
        service.load_records(Party::Bob, bob);
        service.set_reference_values(Party::Alice, reference_values());
        service.set_reference_values(Party::Bob, reference_values());

        let report = service.build_index(Party::Alice, &[SURNAME]).unwrap();
        service.build_index(Party::Bob, &[SURNAME]).unwrap();

        let content = fs::read_to_string(sink.path_for("SNN_2P", Party::Alice)).unwrap();
        assert!(content.ends_with(",\n"));
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);

        let sizes = parse_line(lines[0]);
        assert_eq!(sizes, report.stats.sizes);
        assert_eq!(sizes.iter().sum::<usize>(), 40);
        assert!(sizes.iter().all(|&s| s >= 2));
        assert!(sink.path_for("SNN_2P", Party::Bob).exists());
    }

    #[test]
    fn test_rebuild_appends_a_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = Arc::new(CsvBlockSizeSink::new(dir.path().join("block_sizes")));
        let (alice, bob) = overlapping_parties(30, 10, 9);

        let config = PSigConfigBuilder::new()
            .qgram_len(2)
            .padding('^', '$')
            .build()
            .unwrap();
        let mut service =
            PSigService::with_ports(config, Arc::new(DescriptiveStatistics), sink.clone()).unwrap();
        service.load_records(Party::Alice, alice);
        service.load_records(Party::Bob, bob);
        service.common_bloom_filter(&[SURNAME]).unwrap();
        service.build_index_alice().unwrap();
        service.build_index_alice().unwrap();

        let content = fs::read_to_string(sink.path_for("PSIG", Party::Alice)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], lines[1]);
        assert!(!sink.path_for("PSIG", Party::Bob).exists());
    }
}
