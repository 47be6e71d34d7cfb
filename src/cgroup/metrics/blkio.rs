//! Accessors backed by the `blkio` controller.

use super::Metrics;
use crate::cgroup::stats;

impl Metrics {
    /// Bytes transferred to and from block devices, summed by the kernel over
    /// all devices (`Total` in `blkio.throttle.io_service_bytes`).
    pub fn blkio_service_count(&self) -> i64 {
        stats::read_keyed_long(
            self.blkio.as_ref(),
            "blkio.throttle.io_service_bytes",
            "Total",
        )
    }

    /// Number of I/O operations issued to block devices
    /// (`Total` in `blkio.throttle.io_serviced`).
    pub fn blkio_serviced(&self) -> i64 {
        stats::read_keyed_long(self.blkio.as_ref(), "blkio.throttle.io_serviced", "Total")
    }
}
