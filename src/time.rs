//! # Time conversions
//!
//! Pure numeric mappings between Unix timestamps, Julian dates, NORAD element-set epochs and
//! [`hifitime::Epoch`]. None of these functions hold state and none of the timestamp mappings can
//! fail: out-of-domain inputs produce well-defined values and range checking is left to the
//! caller. Only the calendar-based conversions return a [`Result`].
//!
//! ## Overview
//!
//! - [`julian_from_timestamp`] / [`julian_from_timestamp_ms`] – Unix time → Julian date.
//! - [`timestamp_from_julian`] / [`timestamp_ms_from_julian`] – Julian date → Unix time,
//!   clamped to zero at and before the Unix epoch.
//! - [`julian_from_tle_epoch`] – `YYDDD.DDDDDDDD` element-set epoch → Julian date.
//! - [`theta_g_jd`] – Greenwich mean sidereal angle.
use hifitime::Epoch;

use crate::constants::{
    JulianDate, Radian, DPI, EARTH_ROTATIONS_PER_SIDEREAL_DAY, JD_UNIX_EPOCH, SECONDS_PER_DAY,
};
use crate::sgprop_errors::SgpropError;

const MILLISECONDS_PER_DAY: f64 = SECONDS_PER_DAY * 1000.0;

/// Julian date of a Unix timestamp expressed in seconds.
///
/// Arguments
/// ---------
/// * `seconds`: seconds elapsed since 1970-01-01T00:00:00 UTC (may be negative)
///
/// Return
/// ------
/// * the Julian date `seconds / 86400 + 2440587.5`
pub fn julian_from_timestamp(seconds: i64) -> JulianDate {
    seconds as f64 / SECONDS_PER_DAY + JD_UNIX_EPOCH
}

/// Julian date of a Unix timestamp expressed in milliseconds.
pub fn julian_from_timestamp_ms(milliseconds: i64) -> JulianDate {
    milliseconds as f64 / MILLISECONDS_PER_DAY + JD_UNIX_EPOCH
}

/// Unix timestamp (seconds) of a Julian date.
///
/// The sub-second part is truncated. Dates at or before the Unix epoch clamp to zero.
///
/// Arguments
/// ---------
/// * `date`: Julian date
///
/// Return
/// ------
/// * whole seconds since the Unix epoch, `0` when `date <= 2440587.5`
pub fn timestamp_from_julian(date: JulianDate) -> u64 {
    if date > JD_UNIX_EPOCH {
        ((date - JD_UNIX_EPOCH) * SECONDS_PER_DAY) as u64
    } else {
        0
    }
}

/// Unix timestamp (milliseconds) of a Julian date, with the same clamp as [`timestamp_from_julian`].
pub fn timestamp_ms_from_julian(date: JulianDate) -> u64 {
    if date > JD_UNIX_EPOCH {
        ((date - JD_UNIX_EPOCH) * MILLISECONDS_PER_DAY) as u64
    } else {
        0
    }
}

/// Julian date of an [`Epoch`], in the UTC time scale.
pub fn julian_from_epoch(epoch: Epoch) -> JulianDate {
    epoch.to_jde_utc_days()
}

/// [`Epoch`] of a Julian date interpreted in the UTC time scale.
pub fn epoch_from_julian(date: JulianDate) -> Epoch {
    Epoch::from_jde_utc(date)
}

/// Julian date of day 0.0 of `year`, i.e. December 31st of the previous year at 0h UTC.
///
/// Arguments
/// ---------
/// * `year`: full Gregorian year (e.g. `2000`)
///
/// Return
/// ------
/// * the Julian date of `year`-01-00T00:00:00 UTC, `2451543.5` for the year 2000
///
/// Errors
/// ------
/// * [`SgpropError::Hifitime`] if hifitime rejects the calendar date.
pub fn julian_date_of_year(year: i32) -> Result<JulianDate, SgpropError> {
    let new_year = Epoch::maybe_from_gregorian_utc(year, 1, 1, 0, 0, 0, 0)?;
    Ok(julian_from_epoch(new_year) - 1.0)
}

/// Julian date of a NORAD element-set epoch `YYDDD.DDDDDDDD`.
///
/// The two-digit year follows the usual pivot: `00–56` are 2000–2056 and `57–99` are 1957–1999.
/// The day-of-year part counts from `1.0` at January 1st, 0h UTC.
///
/// Arguments
/// ---------
/// * `epoch`: the packed epoch, e.g. `80275.98708465` for day 275.987 of 1980
///
/// Return
/// ------
/// * the Julian date of the epoch
///
/// Errors
/// ------
/// * [`SgpropError::InvalidTleEpoch`] for negative or non-finite values, two-digit years above 99,
///   or a day-of-year outside `[1, 367)`.
pub fn julian_from_tle_epoch(epoch: f64) -> Result<JulianDate, SgpropError> {
    if !epoch.is_finite() || epoch < 0.0 {
        return Err(SgpropError::InvalidTleEpoch(format!(
            "epoch must be a finite non-negative number, got {epoch}"
        )));
    }

    // exact for integral days
    let two_digit_year = (epoch / 1000.0).trunc();
    let day = epoch - two_digit_year * 1000.0;

    if two_digit_year > 99.0 {
        return Err(SgpropError::InvalidTleEpoch(format!(
            "two-digit year out of range in {epoch}"
        )));
    }
    if !(1.0..367.0).contains(&day) {
        return Err(SgpropError::InvalidTleEpoch(format!(
            "day of year {day} out of range in {epoch}"
        )));
    }

    let year = two_digit_year as i32;
    let year = if year < 57 { year + 2000 } else { year + 1900 };

    Ok(julian_date_of_year(year)? + day)
}

/// Greenwich mean sidereal angle for a Julian date (UT).
///
/// The angle at 0h UT comes from the 1992 Astronomical Almanac polynomial (page B6). The
/// fraction of the day is then added at the sidereal rate.
///
/// Arguments
/// ---------
/// * `jd`: Julian date
///
/// Return
/// ------
/// * the sidereal angle in radians, in `[0, 2π)`
pub fn theta_g_jd(jd: JulianDate) -> Radian {
    let ut = (jd + 0.5).fract();
    let midnight = jd - ut;
    let tu = (midnight - 2_451_545.0) / 36_525.0;

    let gmst = 24_110.548_41 + tu * (8_640_184.812_866 + tu * (0.093_104 - tu * 6.2E-6));
    let gmst = (gmst + SECONDS_PER_DAY * EARTH_ROTATIONS_PER_SIDEREAL_DAY * ut)
        .rem_euclid(SECONDS_PER_DAY);

    DPI * gmst / SECONDS_PER_DAY
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_julian_from_timestamp() {
        assert_eq!(julian_from_timestamp(0), 2440587.5);
        assert_eq!(julian_from_timestamp(86_400), 2440588.5);
        assert_eq!(julian_from_timestamp(-43_200), 2440587.0);
        assert_eq!(julian_from_timestamp_ms(0), 2440587.5);
        assert_eq!(julian_from_timestamp_ms(43_200_000), 2440588.0);
    }

    #[test]
    fn test_timestamp_from_julian_clamps() {
        assert_eq!(timestamp_from_julian(2440587.5), 0);
        assert_eq!(timestamp_from_julian(2440000.0), 0);
        assert_eq!(timestamp_from_julian(f64::NEG_INFINITY), 0);
        assert_eq!(timestamp_ms_from_julian(2440587.5), 0);
        assert_eq!(timestamp_ms_from_julian(2000000.0), 0);
    }

    #[test]
    fn test_timestamp_from_julian_truncates() {
        // 1.5 s after midnight, 2000-01-01
        let jd = 2451544.5 + 1.5 / SECONDS_PER_DAY;
        assert_eq!(timestamp_from_julian(jd), 946_684_801);
        assert_eq!(timestamp_from_julian(2451545.0), 946_728_000);
        assert_eq!(timestamp_ms_from_julian(2440588.5), 86_400_000);
    }

    #[test]
    fn test_julian_date_of_year() {
        assert_abs_diff_eq!(julian_date_of_year(2000).unwrap(), 2451543.5, epsilon = 1e-9);
        assert_abs_diff_eq!(julian_date_of_year(1980).unwrap(), 2444238.5, epsilon = 1e-9);
    }

    #[test]
    fn test_julian_from_tle_epoch() {
        assert_abs_diff_eq!(
            julian_from_tle_epoch(80275.98708465).unwrap(),
            2444514.48708465,
            epsilon = 1e-8
        );
        assert_abs_diff_eq!(
            julian_from_tle_epoch(15129.86961041).unwrap(),
            2457152.36961041,
            epsilon = 1e-8
        );
        assert_abs_diff_eq!(
            julian_from_tle_epoch(56001.0).unwrap(),
            julian_date_of_year(2056).unwrap() + 1.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            julian_from_tle_epoch(57001.0).unwrap(),
            julian_date_of_year(1957).unwrap() + 1.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_julian_from_tle_epoch_first_of_january() {
        for yy in 0..100 {
            let epoch = f64::from(yy) * 1000.0 + 1.0;
            let year = if yy < 57 { 2000 + yy } else { 1900 + yy };

            let jd = julian_from_tle_epoch(epoch).unwrap();
            assert_abs_diff_eq!(jd, julian_date_of_year(year).unwrap() + 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_julian_from_tle_epoch_rejects_garbage() {
        assert!(matches!(
            julian_from_tle_epoch(-1.0),
            Err(SgpropError::InvalidTleEpoch(_))
        ));
        assert!(matches!(
            julian_from_tle_epoch(f64::NAN),
            Err(SgpropError::InvalidTleEpoch(_))
        ));
        assert!(matches!(
            julian_from_tle_epoch(80000.5),
            Err(SgpropError::InvalidTleEpoch(_))
        ));
        assert!(matches!(
            julian_from_tle_epoch(80400.0),
            Err(SgpropError::InvalidTleEpoch(_))
        ));
        assert!(matches!(
            julian_from_tle_epoch(123456.0),
            Err(SgpropError::InvalidTleEpoch(_))
        ));
    }

    #[test]
    fn test_epoch_bridge() {
        let epoch = epoch_from_julian(2459215.5);
        assert_abs_diff_eq!(julian_from_epoch(epoch), 2459215.5, epsilon = 1e-9);
    }

    #[test]
    fn test_theta_g_jd() {
        // J2000.0, GMST = 18.697374558 h
        assert_abs_diff_eq!(theta_g_jd(2451545.0), 4.894961212789145, epsilon = 1e-9);

        let theta = theta_g_jd(2457152.3696104102);
        assert!((0.0..DPI).contains(&theta));
    }
}
