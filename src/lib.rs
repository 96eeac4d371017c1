pub mod cli;
pub mod error;

pub mod commands {
    pub mod filter;
    pub mod merge;
    pub mod run;
}

pub mod core {
    pub mod chromosome;
    pub mod classifier;
    pub mod comments;
    pub mod filter_tag;
    pub mod genotype;
    pub mod header;
    pub mod merger;
    pub mod record;
    pub mod region_flagger;
    pub mod containers {
        pub mod interval_tree;
    }
    #[cfg(test)]
    pub mod test_utils;
}

pub mod external {
    pub mod tool;
    pub mod workflow;
}

pub mod io {
    pub mod bed_reader;
    pub mod readers;
    pub mod vcf_reader;
    pub mod vcf_writer;
}

pub mod utils {
    pub mod util;
}

pub mod constants;

pub use constants::*;
