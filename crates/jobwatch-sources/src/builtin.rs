//! Built-in government recruitment sources.

use jobwatch_core::JobCategory;

/// `(name, base URL, category)` for every built-in source, in visiting order.
pub const BUILTIN_SOURCES: &[(&str, &str, JobCategory)] = &[
    ("UPSC", "https://www.upsc.gov.in", JobCategory::AdministrativeCivilServices),
    ("SSC", "https://www.ssc.nic.in", JobCategory::CentralGovernment),
    ("RRB", "https://www.rrbcdg.gov.in", JobCategory::Railways),
    ("IBPS", "https://www.ibps.in", JobCategory::Banking),
    ("RBI", "https://opportunities.rbi.org.in", JobCategory::Banking),
    ("SBI", "https://sbi.co.in/careers", JobCategory::Banking),
    ("India Post", "https://indiapostgdsonline.gov.in", JobCategory::CentralGovernment),
    ("DRDO", "https://www.drdo.gov.in", JobCategory::Defence),
    ("ISRO", "https://www.isro.gov.in/Careers.html", JobCategory::Defence),
    ("BARC", "https://recruit.barc.gov.in", JobCategory::Defence),
    ("AIIMS", "https://www.aiimsexams.ac.in", JobCategory::HealthMedical),
    ("ESIC", "https://www.esic.nic.in", JobCategory::HealthMedical),
    ("Coal India", "https://coalindia.in/en-us/careers", JobCategory::PublicSectorUndertaking),
    ("BSNL", "https://www.bsnl.co.in/opportunities", JobCategory::PublicSectorUndertaking),
    ("LIC", "https://www.licindia.in/careers", JobCategory::PublicSectorUndertaking),
];
