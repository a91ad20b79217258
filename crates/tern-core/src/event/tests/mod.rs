// Event system test module
#[cfg(test)]
mod bus_tests;
#[cfg(test)]
mod dispatcher_tests;
