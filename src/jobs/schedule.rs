use crate::settings::IocType;

/// Lookup jobs look back 65 minutes...
pub const LOOKUP_EARLIEST: &str = "-65m@m";

/// ...ending 5 minutes ago, so consecutive hourly runs overlap slightly
pub const LOOKUP_LATEST: &str = "-5m@m";

/// Hourly schedule of a lookup job, staggered by 5 minutes per type
pub fn lookup_cron(ioc_type: IocType) -> &'static str {
    match ioc_type {
        IocType::Ipv4 => "10 * * * *",
        IocType::Domain => "15 * * * *",
        IocType::Url => "20 * * * *",
        IocType::Md5 => "25 * * * *",
        IocType::Sha1 => "30 * * * *",
        IocType::Sha256 => "35 * * * *",
    }
}

/// Daily schedule of a cleanup job, one slot per type in the 02:xx window
pub fn cleanup_cron(ioc_type: IocType) -> &'static str {
    match ioc_type {
        IocType::Sha1 => "0 2 * * *",
        IocType::Sha256 => "5 2 * * *",
        IocType::Ipv4 => "40 2 * * *",
        IocType::Domain => "45 2 * * *",
        IocType::Url => "50 2 * * *",
        IocType::Md5 => "55 2 * * *",
    }
}
