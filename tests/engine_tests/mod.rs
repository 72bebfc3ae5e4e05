mod classification_test;
mod fixtures;
