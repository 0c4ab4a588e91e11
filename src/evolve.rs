//! This module contains the evolutionary search over reveal masks.
//!
//! A [Population] owns a set of [Puzzle]s that share a solution grid but
//! differ in which cells are revealed. The [Evolver] drives a generational
//! loop over it: every non-elite individual's reveal mask is mutated, the
//! fittest individuals are carried forward unchanged, and the remaining
//! slots are filled by tournament selection. Fitness is
//! [Puzzle::fitness], which is minimised, so the search drifts towards
//! reveal masks whose difficulty profile matches the target of the fitness
//! function.

use crate::Puzzle;

use rand::Rng;
use rand::rngs::ThreadRng;

use serde::{Deserialize, Serialize};

use std::ops::{Index, IndexMut};

use tracing::{debug, info};

/// A population of puzzles plus a staging area for the next generation.
/// Selection operators append to the staging area; [Population::update]
/// commits it, replacing the current generation.
#[derive(Clone, Default)]
pub struct Population {
    members: Vec<Puzzle>,
    staged: Vec<Puzzle>
}

impl Population {

    /// Creates a new, empty population.
    pub fn new() -> Population {
        Population::default()
    }

    /// Inserts `copies` clones of the given puzzle into the current
    /// generation.
    pub fn insert(&mut self, puzzle: &Puzzle, copies: usize) {
        for _ in 0..copies {
            self.members.push(puzzle.clone());
        }
    }

    /// Gets the number of individuals in the current generation.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Indicates whether the current generation is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Removes all individuals, both current and staged.
    pub fn clear(&mut self) {
        self.members.clear();
        self.staged.clear();
    }

    /// Commits the staged generation: the individuals selected since the
    /// last update become the current generation.
    pub fn update(&mut self) {
        self.members = std::mem::take(&mut self.staged);
    }

    /// Evaluates the fitness of every individual in the current
    /// generation.
    fn evaluate(&mut self, fitness: &mut impl FnMut(&mut Puzzle) -> f64)
            -> Vec<f64> {
        self.members.iter_mut().map(fitness).collect()
    }

    /// Stages `num_copies` clones of each of the `num_elites` individuals
    /// with the lowest fitness. Ties are broken towards the lower index,
    /// so an unchanged incumbent wins against an equally fit newcomer.
    pub fn elite_select(&mut self,
            mut fitness: impl FnMut(&mut Puzzle) -> f64, num_copies: usize,
            num_elites: usize) {
        let scores = self.evaluate(&mut fitness);
        let mut order: Vec<usize> = (0..self.members.len()).collect();
        order.sort_by(|&a, &b| scores[a].partial_cmp(&scores[b]).unwrap());

        for &index in order.iter().take(num_elites) {
            for _ in 0..num_copies {
                self.staged.push(self.members[index].clone());
            }
        }
    }

    /// Stages `num_winners` individuals, each the fittest of
    /// `tournament_size` contestants drawn uniformly (with replacement)
    /// from the current generation.
    pub fn tournament_select(&mut self,
            mut fitness: impl FnMut(&mut Puzzle) -> f64,
            tournament_size: usize, rng: &mut impl Rng, num_winners: usize) {
        let scores = self.evaluate(&mut fitness);

        for _ in 0..num_winners {
            let mut winner = rng.gen_range(0..self.members.len());

            for _ in 1..tournament_size {
                let contestant = rng.gen_range(0..self.members.len());

                if scores[contestant] < scores[winner] {
                    winner = contestant;
                }
            }

            self.staged.push(self.members[winner].clone());
        }
    }
}

impl Index<usize> for Population {
    type Output = Puzzle;

    fn index(&self, index: usize) -> &Puzzle {
        &self.members[index]
    }
}

impl IndexMut<usize> for Population {
    fn index_mut(&mut self, index: usize) -> &mut Puzzle {
        &mut self.members[index]
    }
}

/// The parameters of an [Evolver]. The defaults are a solid starting
/// point: 100 individuals, 1000 generations, a per-cell toggle probability
/// of 1.5 %, tournaments of two and a single elite.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct EvolverConfig {

    /// The number of individuals in the population.
    pub pop_size: usize,

    /// The maximum number of generations to run.
    pub generations: usize,

    /// The probability with which each cell's reveal bit is flipped when
    /// an individual is mutated.
    pub mutation_rate: f64,

    /// The number of contestants per tournament.
    pub tournament_size: usize,

    /// The number of fittest individuals carried into the next generation
    /// unchanged. With at least one elite, the best fitness never
    /// regresses.
    pub num_elites: usize,

    /// If set, the run stops as soon as the best fitness reaches this
    /// value or better.
    pub fitness_target: Option<f64>
}

impl Default for EvolverConfig {
    fn default() -> EvolverConfig {
        EvolverConfig {
            pop_size: 100,
            generations: 1000,
            mutation_rate: 0.015,
            tournament_size: 2,
            num_elites: 1,
            fitness_target: None
        }
    }
}

/// A driver for the generational loop. It owns the random number generator
/// that feeds both mutation and tournament selection; seed it for
/// reproducible runs.
pub struct Evolver<R: Rng> {
    config: EvolverConfig,
    rng: R
}

impl Evolver<ThreadRng> {

    /// Creates an evolver with the default configuration and a
    /// [ThreadRng].
    pub fn new_default() -> Evolver<ThreadRng> {
        Evolver::new(EvolverConfig::default(), rand::thread_rng())
    }
}

impl<R: Rng> Evolver<R> {

    /// Creates an evolver with the given configuration and random number
    /// generator.
    pub fn new(config: EvolverConfig, rng: R) -> Evolver<R> {
        Evolver {
            config,
            rng
        }
    }

    /// Gets the configuration of this evolver.
    pub fn config(&self) -> &EvolverConfig {
        &self.config
    }

    /// Runs the evolutionary search, starting from a population of clones
    /// of the given seed puzzle, and returns the final population. Its
    /// fittest individual sits at index 0.
    ///
    /// Each generation proceeds as mutation of every non-elite individual,
    /// elite selection, then tournament selection for the remaining slots.
    /// The run ends after the configured number of generations, or earlier
    /// once the best fitness reaches the configured target.
    ///
    /// The configuration must not ask for more elites than the population
    /// holds; violating this is a programming error which aborts in debug
    /// builds.
    pub fn run(&mut self, seed: &Puzzle) -> Population {
        let config = self.config;
        debug_assert!(config.num_elites <= config.pop_size,
            "Cannot carry {} elites in a population of {}.",
            config.num_elites, config.pop_size);

        let mut population = Population::new();
        population.insert(seed, config.pop_size);

        for generation in 0..config.generations {
            for i in config.num_elites..population.len() {
                population[i].mutate_reveal(&mut self.rng,
                    config.mutation_rate);
            }

            population.elite_select(Puzzle::fitness, 1, config.num_elites);
            population.tournament_select(Puzzle::fitness,
                config.tournament_size, &mut self.rng,
                config.pop_size - config.num_elites);
            population.update();

            let best = population[0].fitness();
            debug!(generation, best, "committed generation");

            if config.fitness_target.map_or(false, |target| best <= target) {
                info!(generation, best, "reached fitness target");
                break;
            }
        }

        population
    }
}
