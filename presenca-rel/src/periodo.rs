//! Period Calculator
//!
//! Derives the report's date window from an end date and an interval
//! in days, and formats the bounds for each source's expected shape.
//! Interval handling is deliberately lenient: anything outside the
//! accepted range, or non-numeric input, falls back to the default
//! instead of failing the whole report.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

/// Default report interval in days
pub const DIAS_PADRAO: i64 = 7;

/// Accepted interval range, inclusive
pub const DIAS_MIN: i64 = 7;
pub const DIAS_MAX: i64 = 28;

/// ISO date format used by the Câmara and CMSP providers
const FORMATO_ISO: &str = "%Y-%m-%d";

/// An inclusive date window for one report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Periodo {
    pub data_inicial: NaiveDate,
    pub data_final: NaiveDate,
}

impl Periodo {
    /// Compute the window ending at `data_final` and spanning `dias`
    /// days. Out-of-range intervals fall back to [`DIAS_PADRAO`].
    pub fn calcular(data_final: NaiveDate, dias: i64) -> Self {
        let dias = normalizar_dias(dias);
        Self {
            data_inicial: data_final - Duration::days(dias),
            data_final,
        }
    }

    /// Window bounds as `YYYY-MM-DD` strings (Câmara and CMSP
    /// providers filter by ISO date)
    pub fn formato_iso(&self) -> (String, String) {
        (
            self.data_inicial.format(FORMATO_ISO).to_string(),
            self.data_final.format(FORMATO_ISO).to_string(),
        )
    }

    /// Window bounds as raw datetimes covering both days entirely
    /// (the ALESP provider has no date-string filter)
    pub fn intervalo(&self) -> (NaiveDateTime, NaiveDateTime) {
        (
            self.data_inicial.and_time(NaiveTime::MIN),
            self.data_final
                .and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap()),
        )
    }

    /// Whether a timestamp falls inside the window (both bounds
    /// inclusive)
    pub fn contem(&self, dt: NaiveDateTime) -> bool {
        let data = dt.date();
        data >= self.data_inicial && data <= self.data_final
    }
}

/// Clamp an interval to the accepted range; anything outside maps to
/// the default rather than erroring.
pub fn normalizar_dias(dias: i64) -> i64 {
    if (DIAS_MIN..=DIAS_MAX).contains(&dias) {
        dias
    } else {
        debug!(dias, padrao = DIAS_PADRAO, "Interval out of range, using default");
        DIAS_PADRAO
    }
}

/// Lenient interval parsing for caller-supplied strings: non-numeric
/// input silently becomes the default. This is a leniency policy, not
/// an error path.
pub fn dias_de_texto(texto: &str) -> i64 {
    match texto.trim().parse::<i64>() {
        Ok(dias) => normalizar_dias(dias),
        Err(_) => {
            debug!(texto, "Non-numeric interval, using default");
            DIAS_PADRAO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dia(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    #[test]
    fn test_window_is_end_minus_interval() {
        let periodo = Periodo::calcular(dia(2018, 6, 29), 7);
        assert_eq!(periodo.data_inicial, dia(2018, 6, 22));
        assert_eq!(periodo.data_final, dia(2018, 6, 29));
    }

    #[test]
    fn test_window_crosses_month_boundary() {
        let periodo = Periodo::calcular(dia(2018, 5, 3), 14);
        assert_eq!(periodo.data_inicial, dia(2018, 4, 19));
    }

    #[test]
    fn test_out_of_range_interval_defaults() {
        for dias in [-3, 0, 6, 29, 9999] {
            let periodo = Periodo::calcular(dia(2018, 6, 29), dias);
            assert_eq!(periodo.data_inicial, dia(2018, 6, 22), "dias={}", dias);
        }
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        assert_eq!(normalizar_dias(7), 7);
        assert_eq!(normalizar_dias(28), 28);
        assert_eq!(normalizar_dias(15), 15);
    }

    #[test]
    fn test_non_numeric_interval_defaults() {
        assert_eq!(dias_de_texto("abc"), DIAS_PADRAO);
        assert_eq!(dias_de_texto(""), DIAS_PADRAO);
        assert_eq!(dias_de_texto("7.5"), DIAS_PADRAO);
        assert_eq!(dias_de_texto(" 14 "), 14);
    }

    #[test]
    fn test_iso_format() {
        let periodo = Periodo::calcular(dia(2018, 6, 29), 7);
        let (inicio, fim) = periodo.formato_iso();
        assert_eq!(inicio, "2018-06-22");
        assert_eq!(fim, "2018-06-29");
    }

    #[test]
    fn test_intervalo_covers_both_days_entirely() {
        let periodo = Periodo::calcular(dia(2018, 5, 18), 7);
        let (inicio, fim) = periodo.intervalo();
        assert_eq!(inicio.date(), dia(2018, 5, 11));
        assert_eq!(inicio.time(), NaiveTime::MIN);
        assert_eq!(fim.time(), NaiveTime::from_hms_opt(23, 59, 59).unwrap());
    }

    #[test]
    fn test_contem_is_inclusive_on_both_bounds() {
        let periodo = Periodo::calcular(dia(2018, 6, 29), 7);
        assert!(periodo.contem(dia(2018, 6, 22).and_time(NaiveTime::MIN)));
        assert!(periodo.contem(
            dia(2018, 6, 29).and_time(NaiveTime::from_hms_opt(23, 0, 0).unwrap())
        ));
        assert!(!periodo.contem(dia(2018, 6, 21).and_time(NaiveTime::MIN)));
        assert!(!periodo.contem(dia(2018, 6, 30).and_time(NaiveTime::MIN)));
    }
}
