//! Two-locus diploid genome.
//!
//! A genome is an ordered pair of loci (`Sex`, `Size`); each locus holds a
//! maternal and a paternal allele. Phenotypes are pure functions of the
//! genotype, and the fixed-size array makes a wrong-length genome
//! unrepresentable once construction has succeeded.

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::{Result, SimError};

/// Number of loci in every genome.
pub const GENOME_LENGTH: usize = 2;

/// Symbolic allele values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Allele {
    /// Sex locus, X chromosome.
    X,
    /// Sex locus, Y chromosome.
    Y,
    /// Size locus, dominant allele `B`.
    Dominant,
    /// Size locus, recessive allele `b`.
    Recessive,
}

impl Allele {
    /// The single-character symbol used in text genomes.
    pub fn symbol(self) -> char {
        match self {
            Self::X => 'X',
            Self::Y => 'Y',
            Self::Dominant => 'B',
            Self::Recessive => 'b',
        }
    }

    fn from_symbol(symbol: char, locus: Locus) -> Result<Self> {
        let allele = match symbol {
            'X' => Self::X,
            'Y' => Self::Y,
            'B' => Self::Dominant,
            'b' => Self::Recessive,
            _ => {
                return Err(SimError::UnknownAllele {
                    symbol: symbol.to_string(),
                    locus: locus.name(),
                });
            }
        };
        if locus.alphabet().contains(&allele) {
            Ok(allele)
        } else {
            Err(SimError::UnknownAllele {
                symbol: symbol.to_string(),
                locus: locus.name(),
            })
        }
    }
}

/// Genetic positions, in genome order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locus {
    /// Determines sex through the paternal allele.
    Sex = 0,
    /// Determines size phenotype.
    Size = 1,
}

impl Locus {
    /// All loci in genome order.
    pub const ALL: [Locus; GENOME_LENGTH] = [Locus::Sex, Locus::Size];

    /// Alleles that may appear at this locus.
    pub fn alphabet(self) -> &'static [Allele] {
        match self {
            Self::Sex => &[Allele::X, Allele::Y],
            Self::Size => &[Allele::Dominant, Allele::Recessive],
        }
    }

    /// Human-readable locus name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sex => "sex",
            Self::Size => "size",
        }
    }
}

/// The two alleles held at one locus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenePair {
    /// Allele inherited from the mother.
    pub maternal: Allele,
    /// Allele inherited from the father.
    pub paternal: Allele,
}

impl GenePair {
    /// Creates a gene pair.
    pub fn new(maternal: Allele, paternal: Allele) -> Self {
        Self { maternal, paternal }
    }

    /// Returns true if the pair holds the given allele in either slot.
    pub fn contains(&self, allele: Allele) -> bool {
        self.maternal == allele || self.paternal == allele
    }

    fn random<R: Rng>(locus: Locus, rng: &mut R) -> Self {
        let alphabet = locus.alphabet();
        Self {
            maternal: alphabet[rng.random_range(0..alphabet.len())],
            paternal: alphabet[rng.random_range(0..alphabet.len())],
        }
    }

    /// Picks one of the two alleles uniformly at random.
    fn pick<R: Rng>(&self, rng: &mut R) -> Allele {
        if rng.random_bool(0.5) {
            self.maternal
        } else {
            self.paternal
        }
    }
}

/// Biological sex derived from the sex locus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Paternal sex allele is not `Y`.
    Female,
    /// Paternal sex allele is `Y`.
    Male,
}

/// Size category derived from the size locus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizePhenotype {
    /// `(b, b)`.
    Small,
    /// Heterozygous.
    Medium,
    /// `(B, B)`.
    Large,
}

impl SizePhenotype {
    /// All size categories, smallest first.
    pub const ALL: [SizePhenotype; 3] = [Self::Small, Self::Medium, Self::Large];
}

/// A fish genome: exactly one gene pair per [`Locus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genome {
    pairs: [GenePair; GENOME_LENGTH],
}

impl Genome {
    /// Builds a genome from explicit sex and size pairs, validating each
    /// allele against its locus alphabet.
    pub fn new(sex: GenePair, size: GenePair) -> Result<Self> {
        Self::from_pairs(&[sex, size])
    }

    /// Builds a genome from a gene pair list in locus order.
    ///
    /// Lists that are not exactly [`GENOME_LENGTH`] long, or that hold an
    /// allele foreign to its locus, are rejected.
    pub fn from_pairs(pairs: &[GenePair]) -> Result<Self> {
        let pairs: [GenePair; GENOME_LENGTH] =
            pairs.try_into().map_err(|_| SimError::InvalidGenome {
                expected: GENOME_LENGTH,
                found: pairs.len(),
            })?;

        for (locus, pair) in Locus::ALL.iter().zip(pairs.iter()) {
            for allele in [pair.maternal, pair.paternal] {
                if !locus.alphabet().contains(&allele) {
                    return Err(SimError::UnknownAllele {
                        symbol: allele.symbol().to_string(),
                        locus: locus.name(),
                    });
                }
            }
        }

        Ok(Self { pairs })
    }

    /// Samples every allele slot independently and uniformly from its locus
    /// alphabet.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            pairs: Locus::ALL.map(|locus| GenePair::random(locus, rng)),
        }
    }

    /// Mendelian crossover with independent loci.
    ///
    /// For each locus the offspring's maternal allele is one of the mother's
    /// two alleles and its paternal allele is one of the father's two, each
    /// chosen uniformly.
    pub fn cross<R: Rng>(mother: &Genome, father: &Genome, rng: &mut R) -> Self {
        Self {
            pairs: Locus::ALL.map(|locus| GenePair {
                maternal: mother[locus].pick(rng),
                paternal: father[locus].pick(rng),
            }),
        }
    }

    /// Gene pairs in locus order.
    pub fn pairs(&self) -> &[GenePair; GENOME_LENGTH] {
        &self.pairs
    }

    /// Sex phenotype: male iff the paternal sex allele is `Y`.
    pub fn sex(&self) -> Sex {
        if self[Locus::Sex].paternal == Allele::Y {
            Sex::Male
        } else {
            Sex::Female
        }
    }

    /// Returns true if this genome is male.
    pub fn is_male(&self) -> bool {
        self.sex() == Sex::Male
    }

    /// Size phenotype, a function of the size locus only.
    pub fn size(&self) -> SizePhenotype {
        let pair = self[Locus::Size];
        match (pair.maternal, pair.paternal) {
            (Allele::Recessive, Allele::Recessive) => SizePhenotype::Small,
            (Allele::Dominant, Allele::Dominant) => SizePhenotype::Large,
            _ => SizePhenotype::Medium,
        }
    }
}

impl Index<Locus> for Genome {
    type Output = GenePair;

    fn index(&self, locus: Locus) -> &GenePair {
        &self.pairs[locus as usize]
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: Vec<String> = self
            .pairs
            .iter()
            .map(|p| format!("{}{}", p.maternal.symbol(), p.paternal.symbol()))
            .collect();
        write!(f, "{}", text.join(" "))
    }
}

/// Parses genomes written as whitespace-separated locus pairs, e.g. `"XY Bb"`.
impl FromStr for Genome {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.len() != GENOME_LENGTH {
            return Err(SimError::InvalidGenome {
                expected: GENOME_LENGTH,
                found: tokens.len(),
            });
        }

        let mut pairs = Vec::with_capacity(GENOME_LENGTH);
        for (locus, token) in Locus::ALL.iter().zip(tokens) {
            let symbols: Vec<char> = token.chars().collect();
            let [maternal, paternal] = symbols.as_slice() else {
                return Err(SimError::UnknownAllele {
                    symbol: token.to_string(),
                    locus: locus.name(),
                });
            };
            pairs.push(GenePair {
                maternal: Allele::from_symbol(*maternal, *locus)?,
                paternal: Allele::from_symbol(*paternal, *locus)?,
            });
        }
        Self::from_pairs(&pairs)
    }
}

/// Phenotype counts over a list of genomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeCensus {
    /// Number of small genomes.
    pub small: usize,
    /// Number of medium genomes.
    pub medium: usize,
    /// Number of large genomes.
    pub large: usize,
    /// Number of female genomes.
    pub female: usize,
    /// Number of male genomes.
    pub male: usize,
}

impl GenomeCensus {
    /// Counts phenotypes over any iterator of genome references.
    pub fn count<'a>(genomes: impl IntoIterator<Item = &'a Genome>) -> Self {
        let mut census = Self::default();
        for genome in genomes {
            match genome.size() {
                SizePhenotype::Small => census.small += 1,
                SizePhenotype::Medium => census.medium += 1,
                SizePhenotype::Large => census.large += 1,
            }
            match genome.sex() {
                Sex::Female => census.female += 1,
                Sex::Male => census.male += 1,
            }
        }
        census
    }

    /// Total number of genomes counted.
    pub fn total(&self) -> usize {
        self.female + self.male
    }

    /// Count for one size category.
    pub fn of_size(&self, size: SizePhenotype) -> usize {
        match size {
            SizePhenotype::Small => self.small,
            SizePhenotype::Medium => self.medium,
            SizePhenotype::Large => self.large,
        }
    }
}
