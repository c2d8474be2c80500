// Narrow a category down to the tasks eligible for a roll

use crate::models::{Category, Task, TimeBucket};
use rand::Rng;
use rand::seq::SliceRandom;

/// Result of picking a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Roll from these tasks
    Eligible(Vec<Task>),
    /// Ask which time bucket to roll from, then call [`resolve`]
    ChooseBucket(Vec<TimeBucket>),
}

/// Decide what to roll from for `category`.
///
/// Non time-sensitive categories roll from every task. Otherwise the task
/// list is scanned in order and a bucket is recorded each time a task's time
/// exceeds the highest seen so far. That scan is order-dependent: `[1, 4, 2]`
/// records 1 and 4 but never 2. A single recorded bucket rolls from every task.
pub fn select(category: &Category) -> Selection {
    if !category.time_sensitive {
        return Selection::Eligible(category.tasks.clone());
    }

    let buckets = candidate_buckets(&category.tasks);
    if buckets.len() == 1 {
        return Selection::Eligible(category.tasks.clone());
    }

    Selection::ChooseBucket(buckets)
}

/// Like [`select`], but with a bucket the caller already knows.
///
/// The bucket is ignored for categories that are not time-sensitive.
pub fn select_with(category: &Category, bucket: Option<TimeBucket>) -> Selection {
    match (category.time_sensitive, bucket) {
        (true, Some(bucket)) => Selection::Eligible(resolve(category, bucket)),
        _ => select(category),
    }
}

/// Tasks whose time matches `bucket` exactly
pub fn resolve(category: &Category, bucket: TimeBucket) -> Vec<Task> {
    category.tasks.iter().filter(|t| t.time == bucket).cloned().collect()
}

fn candidate_buckets(tasks: &[Task]) -> Vec<TimeBucket> {
    let mut highest_seen = 0u8;
    let mut buckets = Vec::new();

    for task in tasks {
        if task.time.value() > highest_seen {
            highest_seen = task.time.value();
            buckets.push(task.time);
        }
    }

    buckets
}

/// Pick one task uniformly at random
pub fn roll<'a, R: Rng + ?Sized>(tasks: &'a [Task], rng: &mut R) -> Option<&'a Task> {
    tasks.choose(rng)
}
