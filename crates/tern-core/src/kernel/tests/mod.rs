#[cfg(test)]
mod dispatch_tests;
#[cfg(test)]
mod fixtures;
