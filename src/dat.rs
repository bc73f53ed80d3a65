//! The simulator's ASCII tabular formats.
//!
//! Profile files hold one block per time instant: a header
//! `YYYY-MM-DD HH:MM:SS  <n>  <updown>` followed by `n` lines `z v1 [v2 ...]`.
//! Time series files hold one line `YYYY-MM-DD HH:MM:SS v1 [v2 ...]` per time
//! instant. Partitioned spectrum files start with the band count and the band
//! frequencies, followed by one line per time instant holding the eastward
//! then the northward band values.

use {
    crate::{
        constants::*,
        error::{Error, Result},
        mld::ScalarVerticalProfile,
        stokes::{FrequencyBands, SpectrumSeries, StokesSeries},
    },
    chrono::NaiveDateTime,
    ndarray::{Array2, ArrayView1, ArrayView2},
    std::{
        fs::File,
        io::{BufRead, BufReader, BufWriter, Write},
        path::{Path, PathBuf},
    },
};

/// Writes full depth profiles, surface first. `columns` are (time, depth) arrays.
pub fn write_profiles<W: Write>(
    w: &mut W,
    times: &[NaiveDateTime],
    z: &[f64],
    columns: &[ArrayView2<f64>],
) -> Result<()> {
    for (i, time) in times.iter().enumerate() {
        writeln!(
            w,
            "{}  {}  {}",
            time.format(TIME_FORMAT),
            z.len(),
            UPDOWN_TOP_DOWN
        )?;
        for (j, z) in z.iter().enumerate() {
            write!(w, "{:9.3}", z)?;
            for column in columns {
                write!(w, " {:12.6}", column[[i, j]])?;
            }
            writeln!(w)?;
        }
    }
    Ok(())
}

pub fn write_timeseries<W: Write>(
    w: &mut W,
    times: &[NaiveDateTime],
    columns: &[ArrayView1<f64>],
) -> Result<()> {
    for (i, time) in times.iter().enumerate() {
        write!(w, "{}", time.format(TIME_FORMAT))?;
        for column in columns {
            write!(w, "  {:12.6}", column[i])?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Saves the profile and surface files of a Stokes drift series.
pub fn save_stokes(series: &StokesSeries, profile_path: &Path, surface_path: &Path) -> Result<()> {
    let mut w = BufWriter::new(File::create(profile_path)?);
    write_profiles(
        &mut w,
        series.times(),
        series.grid().z(),
        &[series.eastward().view(), series.northward().view()],
    )?;
    w.flush()?;

    let mut w = BufWriter::new(File::create(surface_path)?);
    write_timeseries(
        &mut w,
        series.times(),
        &[series.surface_eastward(), series.surface_northward()],
    )?;
    w.flush()?;

    Ok(())
}

/// One column of a profile file.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ProfileSeries {
    pub times: Vec<NaiveDateTime>,
    pub profiles: Vec<ScalarVerticalProfile>,
}

/// Line reader that skips blank and `#` lines and remembers where it is.
struct Lines<R> {
    inner: std::io::Lines<R>,
    path: PathBuf,
    number: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R, path: &Path) -> Self {
        Lines {
            inner: reader.lines(),
            path: path.to_owned(),
            number: 0,
        }
    }

    fn next(&mut self) -> Result<Option<String>> {
        for line in &mut self.inner {
            let line = line?;
            self.number += 1;
            let trimmed = line.trim();
            if !trimmed.is_empty() && !trimmed.starts_with('#') {
                return Ok(Some(trimmed.to_owned()));
            }
        }
        Ok(None)
    }

    fn expect(&mut self, what: &str) -> Result<String> {
        self.next()?
            .ok_or_else(|| self.error(format!("unexpected end of file, expected {}", what)))
    }

    fn error(&self, reason: String) -> Error {
        Error::Parse {
            path: self.path.clone(),
            line: self.number,
            reason,
        }
    }

    fn number<T: std::str::FromStr>(&self, token: &str) -> Result<T> {
        token
            .parse::<T>()
            .map_err(|_| self.error(format!("invalid number {:?}", token)))
    }

    fn numbers(&self, tokens: &[&str]) -> Result<Vec<f64>> {
        tokens.iter().map(|token| self.number(token)).collect()
    }

    /// Splits off the leading timestamp of a line.
    fn time<'a>(&self, line: &'a str) -> Result<(NaiveDateTime, Vec<&'a str>)> {
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        if tokens.len() < 2 {
            return Err(self.error("missing timestamp".to_owned()));
        }
        let stamp = format!("{} {}", tokens[0], tokens[1]);
        let time = NaiveDateTime::parse_from_str(&stamp, TIME_FORMAT)
            .map_err(|e| self.error(format!("invalid timestamp {:?}: {}", stamp, e)))?;
        Ok((time, tokens[2..].to_vec()))
    }
}

/// Reads value column `column` (1 is the first after z) of every block.
pub fn read_profiles<R: BufRead>(reader: R, path: &Path, column: usize) -> Result<ProfileSeries> {
    let mut lines = Lines::new(reader, path);
    let mut series = ProfileSeries::default();

    while let Some(header) = lines.next()? {
        let (time, rest) = lines.time(&header)?;
        if rest.len() != 2 {
            return Err(lines.error("expected \"<count> <updown>\" after the timestamp".to_owned()));
        }
        let n = lines.number::<usize>(rest[0])?;
        let updown = lines.number::<usize>(rest[1])?;

        let mut z = Vec::with_capacity(n);
        let mut values = Vec::with_capacity(n);
        for _ in 0..n {
            let line = lines.expect("a profile sample")?;
            let tokens = line.split_whitespace().collect::<Vec<_>>();
            if tokens.len() <= column {
                return Err(lines.error(format!(
                    "expected at least {} columns, found {}",
                    column + 1,
                    tokens.len()
                )));
            }
            z.push(lines.number(tokens[0])?);
            values.push(lines.number(tokens[column])?);
        }

        match updown {
            UPDOWN_TOP_DOWN => (),
            UPDOWN_BOTTOM_UP => {
                z.reverse();
                values.reverse();
            }
            _ => return Err(lines.error(format!("invalid updown flag {}", updown))),
        }

        series.times.push(time);
        series.profiles.push(ScalarVerticalProfile::new(z, values)?);
    }

    Ok(series)
}

pub fn load_profiles(path: &Path, column: usize) -> Result<ProfileSeries> {
    read_profiles(BufReader::new(File::open(path)?), path, column)
}

pub fn read_spectrum<R: BufRead>(reader: R, path: &Path) -> Result<SpectrumSeries> {
    let mut lines = Lines::new(reader, path);

    let count = lines.expect("the band count")?;
    let nbands = lines.number::<usize>(&count)?;

    let line = lines.expect("the band frequencies")?;
    let frequencies = lines.numbers(&line.split_whitespace().collect::<Vec<_>>())?;
    if frequencies.len() != nbands {
        return Err(lines.error(format!(
            "expected {} band frequencies, found {}",
            nbands,
            frequencies.len()
        )));
    }

    let mut times = vec![];
    let mut eastward = vec![];
    let mut northward = vec![];
    while let Some(line) = lines.next()? {
        let (time, rest) = lines.time(&line)?;
        if rest.len() != 2 * nbands {
            return Err(lines.error(format!(
                "expected {} band values, found {}",
                2 * nbands,
                rest.len()
            )));
        }
        let values = lines.numbers(&rest)?;
        times.push(time);
        eastward.extend_from_slice(&values[..nbands]);
        northward.extend_from_slice(&values[nbands..]);
    }

    let shape = (times.len(), nbands);
    let to_array = |values| {
        Array2::from_shape_vec(shape, values).map_err(|e| Error::Parse {
            path: path.to_owned(),
            line: 0,
            reason: e.to_string(),
        })
    };
    let eastward = to_array(eastward)?;
    let northward = to_array(northward)?;

    SpectrumSeries::new(times, FrequencyBands(frequencies), eastward, northward)
}

pub fn load_spectrum(path: &Path) -> Result<SpectrumSeries> {
    read_spectrum(BufReader::new(File::open(path)?), path)
}
